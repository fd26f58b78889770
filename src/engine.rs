//! Tokenizer engine capability contract.
//!
//! An engine is the component that actually performs morphological analysis.
//! Polydict never looks inside one: it only needs an engine to turn text into
//! an ordered list of [`RawToken`]s, each carrying a surface form, a source
//! position, positional feature strings and a classification.
//!
//! Engines are made available through an [`EngineProvider`], which knows the
//! engine's identity, its declared feature table and how to construct it.
//! The providers compiled into this crate are listed by [`builtin_providers`].
//!
//! # Available Engines
//!
//! - [`script::Tokenizer`] - Splits text into runs of the same script
//! - [`unicode_word::Tokenizer`] - Unicode word boundaries (UAX #29)
//! - `ipadic::Tokenizer` - Lindera with IPADIC (requires the `ipadic` feature)
//! - `unidic::Tokenizer` - Lindera with UniDic (requires the `unidic` feature)
//!
//! # Examples
//!
//! ```
//! use polydict::engine::Engine;
//! use polydict::engine::script::Tokenizer;
//!
//! let mut engine = Tokenizer::new();
//! let tokens = engine.tokenize("東京タワー").unwrap();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].surface, "東京");
//! assert_eq!(tokens[1].position, 2);
//! ```

pub mod provider;
pub mod script;
pub mod unicode_word;

#[cfg(any(feature = "ipadic", feature = "unidic"))]
mod lindera;

#[cfg(feature = "ipadic")]
pub mod ipadic;

#[cfg(feature = "unidic")]
pub mod unidic;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use provider::{EngineProvider, FnProvider, TypeProvider};

/// How an engine classified a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// Found in the engine's system dictionary.
    Known,
    /// Produced by unknown-word processing.
    Unknown,
    /// Found in a user-supplied dictionary.
    UserDefined,
}

/// A token exactly as an engine produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    /// The text of the token as it appears in the input.
    pub surface: String,

    /// Character offset of the token in the input text.
    pub position: usize,

    /// Positional features; their meaning is given by the engine's feature table.
    pub features: Vec<String>,

    /// Classification of the token.
    pub kind: TokenKind,
}

impl RawToken {
    /// Create a known token without features.
    pub fn new<S: Into<String>>(surface: S, position: usize) -> Self {
        RawToken {
            surface: surface.into(),
            position,
            features: Vec::new(),
            kind: TokenKind::Known,
        }
    }

    /// Set the positional features of this token.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Set the classification of this token.
    pub fn with_kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Trait for tokenizer engines.
///
/// `tokenize` takes `&mut self`: an engine is not assumed to be safe for
/// concurrent use, so callers sharing one must serialize access to it.
///
/// # Examples
///
/// Implementing a custom engine:
///
/// ```
/// use polydict::engine::{Engine, RawToken};
/// use polydict::error::Result;
///
/// struct CommaEngine;
///
/// impl Engine for CommaEngine {
///     fn tokenize(&mut self, text: &str) -> Result<Vec<RawToken>> {
///         let mut position = 0;
///         let mut tokens = Vec::new();
///         for part in text.split_inclusive(',') {
///             tokens.push(RawToken::new(part, position));
///             position += part.chars().count();
///         }
///         Ok(tokens)
///     }
/// }
/// ```
pub trait Engine: Send {
    /// Analyse `text` and return its tokens in source order.
    fn tokenize(&mut self, text: &str) -> Result<Vec<RawToken>>;
}

/// A feature table declared alongside an engine.
///
/// Each entry names one feature slot and the index of that slot in
/// [`RawToken::features`].
pub trait FeatureFields {
    /// Declared `(name, index)` pairs, in declaration order.
    const FIELDS: &'static [(&'static str, i32)];
}

/// An engine type that can be constructed without arguments.
pub trait EngineType: Engine + Sized + 'static {
    /// The companion type declaring this engine's feature slots.
    type Fields: FeatureFields;

    /// Construct a ready-to-use engine.
    fn create() -> Result<Self>;
}

/// Engines compiled into this crate, in registration order.
///
/// The first entry becomes the default dictionary of a registry discovered
/// from this table.
pub fn builtin_providers() -> Vec<Arc<dyn EngineProvider>> {
    let mut providers: Vec<Arc<dyn EngineProvider>> = Vec::new();

    #[cfg(feature = "ipadic")]
    providers.push(Arc::new(TypeProvider::<ipadic::Tokenizer>::new()));

    #[cfg(feature = "unidic")]
    providers.push(Arc::new(TypeProvider::<unidic::Tokenizer>::new()));

    providers.push(Arc::new(TypeProvider::<script::Tokenizer>::new()));
    providers.push(Arc::new(TypeProvider::<unicode_word::Tokenizer>::new()));

    providers
}
