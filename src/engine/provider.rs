//! Engine providers: how a registry learns about and constructs engines.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::dictionary::schema::FeatureSchema;
use crate::engine::{Engine, EngineType, FeatureFields};
use crate::error::Result;

/// Trait implemented by everything that can be registered as a dictionary.
pub trait EngineProvider: Send + Sync {
    /// A stable identity for the engine implementation, such as its type path.
    fn identity(&self) -> &str;

    /// The feature schema the engine's tokens follow.
    fn feature_schema(&self) -> Result<FeatureSchema>;

    /// Construct a new engine instance.
    fn create(&self) -> Result<Box<dyn Engine>>;
}

/// Provider for an [`EngineType`], identified by its Rust type path.
pub struct TypeProvider<E> {
    _engine: PhantomData<fn() -> E>,
}

impl<E: EngineType> TypeProvider<E> {
    /// Create a provider for `E`.
    pub fn new() -> Self {
        TypeProvider {
            _engine: PhantomData,
        }
    }
}

impl<E: EngineType> Default for TypeProvider<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EngineType> EngineProvider for TypeProvider<E> {
    fn identity(&self) -> &str {
        type_name::<E>()
    }

    fn feature_schema(&self) -> Result<FeatureSchema> {
        FeatureSchema::from_fields(<E::Fields as FeatureFields>::FIELDS)
    }

    fn create(&self) -> Result<Box<dyn Engine>> {
        Ok(Box::new(E::create()?))
    }
}

impl<E> fmt::Debug for TypeProvider<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeProvider")
            .field("engine", &type_name::<E>())
            .finish()
    }
}

type EngineFactory = Box<dyn Fn() -> Result<Box<dyn Engine>> + Send + Sync>;

/// Provider built from a closure, for engines registered explicitly at startup.
///
/// # Examples
///
/// ```
/// use polydict::engine::{EngineProvider, FnProvider};
/// use polydict::engine::script;
///
/// let provider = FnProvider::new("custom::Tokenizer", &[("SCRIPT", 0)], || {
///     Ok(script::Tokenizer::new())
/// });
/// assert_eq!(provider.identity(), "custom::Tokenizer");
/// assert_eq!(provider.feature_schema().unwrap().get("SCRIPT"), Some(0));
/// ```
pub struct FnProvider {
    identity: String,
    fields: Vec<(String, i32)>,
    factory: EngineFactory,
}

impl FnProvider {
    /// Create a provider from an identity, a feature table and a factory.
    pub fn new<F, E>(identity: impl Into<String>, fields: &[(&str, i32)], factory: F) -> Self
    where
        F: Fn() -> Result<E> + Send + Sync + 'static,
        E: Engine + 'static,
    {
        FnProvider {
            identity: identity.into(),
            fields: fields
                .iter()
                .map(|(name, index)| (name.to_string(), *index))
                .collect(),
            factory: Box::new(move || Ok(Box::new(factory()?) as Box<dyn Engine>)),
        }
    }
}

impl EngineProvider for FnProvider {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn feature_schema(&self) -> Result<FeatureSchema> {
        FeatureSchema::from_fields(&self.fields)
    }

    fn create(&self) -> Result<Box<dyn Engine>> {
        (self.factory)()
    }
}

impl fmt::Debug for FnProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider")
            .field("identity", &self.identity)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::script;
    use crate::error::PolydictError;

    #[test]
    fn test_type_provider() {
        let provider = TypeProvider::<script::Tokenizer>::new();

        assert_eq!(provider.identity(), "polydict::engine::script::Tokenizer");
        let schema = provider.feature_schema().unwrap();
        assert_eq!(schema.get("SCRIPT"), Some(script::DictionaryField::SCRIPT));

        let mut engine = provider.create().unwrap();
        assert_eq!(engine.tokenize("abc").unwrap().len(), 1);
    }

    #[test]
    fn test_fn_provider_propagates_factory_errors() {
        let provider = FnProvider::new("broken::Tokenizer", &[], || {
            Err::<script::Tokenizer, _>(PolydictError::other("no dictionary file"))
        });

        assert!(provider.create().is_err());
    }
}
