//! Dictionary-agnostic tokens.
//!
//! A [`Token`] pairs a [`RawToken`] with the [`Dictionary`] that produced it.
//! Features are looked up by name through the dictionary's schema at access
//! time; a name the schema does not declare, or a slot the engine did not
//! fill, reads as [`DEFAULT_FEATURE_VALUE`].
//!
//! # Examples
//!
//! ```
//! use polydict::dictionary::DictionaryRegistry;
//! use polydict::tokenizer::Tokenizer;
//!
//! let registry = DictionaryRegistry::with_builtin_engines();
//! let tokenizer = Tokenizer::for_dictionary(&registry, Some("script")).unwrap();
//! let tokens = tokenizer.tokenize("カタカナ").unwrap();
//!
//! assert_eq!(tokens[0].surface(), "カタカナ");
//! assert_eq!(tokens[0].feature("SCRIPT"), "KATAKANA");
//! assert_eq!(tokens[0].feature("READING"), "*");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::dictionary::Dictionary;
use crate::engine::{RawToken, TokenKind};

/// Value returned for features a token does not have.
pub const DEFAULT_FEATURE_VALUE: &str = "*";

/// A token together with the dictionary that interprets its features.
#[derive(Clone)]
pub struct Token {
    dictionary: Arc<Dictionary>,
    raw: RawToken,
}

impl Token {
    /// Wrap a raw token produced under `dictionary`.
    pub fn new(dictionary: Arc<Dictionary>, raw: RawToken) -> Self {
        Token { dictionary, raw }
    }

    /// The surface form of the token.
    pub fn surface(&self) -> &str {
        &self.raw.surface
    }

    /// Character offset of the token in the source text.
    pub fn position(&self) -> usize {
        self.raw.position
    }

    /// The engine's classification of the token.
    pub fn kind(&self) -> TokenKind {
        self.raw.kind
    }

    /// Is it from the dictionary?
    pub fn is_known(&self) -> bool {
        self.raw.kind == TokenKind::Known
    }

    /// Is it an unknown word?
    pub fn is_unknown(&self) -> bool {
        self.raw.kind == TokenKind::Unknown
    }

    /// Is it from a user dictionary?
    pub fn is_user(&self) -> bool {
        self.raw.kind == TokenKind::UserDefined
    }

    /// All positional features, as the engine produced them.
    pub fn all_features(&self) -> &[String] {
        &self.raw.features
    }

    /// Names of the features this token's dictionary declares.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.dictionary.schema().names()
    }

    /// Look up a feature by name.
    ///
    /// Returns [`DEFAULT_FEATURE_VALUE`] when the name is not declared or its
    /// slot lies outside the features the engine produced.
    pub fn feature(&self, name: &str) -> &str {
        self.dictionary
            .schema()
            .get(name)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.raw.features.get(index))
            .map(String::as_str)
            .unwrap_or(DEFAULT_FEATURE_VALUE)
    }

    /// The dictionary this token belongs to.
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// The wrapped raw token.
    pub fn raw(&self) -> &RawToken {
        &self.raw
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token{{surfaceForm='{}', position={}, dictionary={}}}",
            self.surface(),
            self.position(),
            self.dictionary.name()
        )
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("surface", &self.raw.surface)
            .field("position", &self.raw.position)
            .field("kind", &self.raw.kind)
            .field("dictionary", &self.dictionary.name())
            .finish()
    }
}
