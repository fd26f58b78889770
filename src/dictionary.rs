//! Dictionaries: registered engines together with their feature schemas.
//!
//! A [`Dictionary`] is created once, when an engine provider is registered in
//! a [`DictionaryRegistry`], and never changes afterwards. Every token
//! produced under a dictionary keeps a reference to it so that feature names
//! can be resolved against the dictionary's [`FeatureSchema`].
//!
//! # Examples
//!
//! ```
//! use polydict::dictionary::DictionaryRegistry;
//!
//! let registry = DictionaryRegistry::with_builtin_engines();
//! let names = registry.names();
//! assert!(names.contains(&"script".to_string()));
//!
//! let dictionary = registry.lookup(None).unwrap();
//! assert_eq!(dictionary.name(), names[0]);
//! ```

pub mod registry;
pub mod schema;

use std::fmt;
use std::sync::Arc;

use crate::engine::{Engine, EngineProvider};
use crate::error::Result;

pub use registry::DictionaryRegistry;
pub use schema::FeatureSchema;

/// Namespace stripped from engine identities when deriving dictionary names.
pub const ENGINE_NAMESPACE: &str = "polydict::engine";

/// Conventional suffix of engine type identities.
pub const ENGINE_TYPE_SUFFIX: &str = "::Tokenizer";

/// Derive a dictionary name from an engine identity.
///
/// The engine namespace prefix and the `::Tokenizer` suffix are removed;
/// identities outside the namespace only lose the suffix.
///
/// ```
/// use polydict::dictionary::derive_name;
///
/// assert_eq!(derive_name("polydict::engine::ipadic::Tokenizer"), "ipadic");
/// assert_eq!(derive_name("my_crate::engines::Tokenizer"), "my_crate::engines");
/// assert_eq!(derive_name("polydict::engine::custom"), "custom");
/// ```
pub fn derive_name(identity: &str) -> String {
    let name = identity
        .strip_prefix(ENGINE_NAMESPACE)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(identity);

    name.strip_suffix(ENGINE_TYPE_SUFFIX)
        .unwrap_or(name)
        .to_string()
}

/// A registered engine.
pub struct Dictionary {
    name: String,
    provider: Arc<dyn EngineProvider>,
    schema: FeatureSchema,
}

impl Dictionary {
    pub(crate) fn new(
        name: String,
        provider: Arc<dyn EngineProvider>,
        schema: FeatureSchema,
    ) -> Self {
        Dictionary {
            name,
            provider,
            schema,
        }
    }

    /// The name this dictionary is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the engine implementation.
    pub fn identity(&self) -> &str {
        self.provider.identity()
    }

    /// The feature schema of this dictionary's tokens.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature names in declaration order.
    pub fn feature_names(&self) -> Vec<String> {
        self.schema.names().map(str::to_string).collect()
    }

    /// Construct a new engine instance for this dictionary.
    pub fn create_engine(&self) -> Result<Box<dyn Engine>> {
        self.provider.create()
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("name", &self.name)
            .field("identity", &self.identity())
            .field("schema", &self.schema)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name() {
        assert_eq!(derive_name("polydict::engine::script::Tokenizer"), "script");
        assert_eq!(
            derive_name("polydict::engine::unicode_word::Tokenizer"),
            "unicode_word"
        );
        assert_eq!(derive_name("Tokenizer"), "Tokenizer");
        assert_eq!(derive_name("other::Engine"), "other::Engine");
    }
}
