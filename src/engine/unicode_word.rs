//! Unicode word-boundary engine.
//!
//! Segments text with the Unicode Text Segmentation algorithm (UAX #29).
//! Unlike a search-oriented word tokenizer, every segment is kept, including
//! whitespace and punctuation, so the surfaces of the produced tokens always
//! concatenate back to the input.

use unicode_segmentation::UnicodeSegmentation;

use crate::engine::script::Script;
use crate::engine::{Engine, EngineType, FeatureFields, RawToken, TokenKind};
use crate::error::Result;

/// Feature slots of the Unicode word engine.
pub struct DictionaryField;

impl DictionaryField {
    pub const WORD_CLASS: i32 = 0;
    pub const SCRIPT: i32 = 1;
    pub const LOWERCASE: i32 = 2;
}

impl FeatureFields for DictionaryField {
    const FIELDS: &'static [(&'static str, i32)] = &[
        ("WORD_CLASS", Self::WORD_CLASS),
        ("SCRIPT", Self::SCRIPT),
        ("LOWERCASE", Self::LOWERCASE),
    ];
}

/// An engine that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new Unicode word engine.
    pub fn new() -> Self {
        Tokenizer
    }

    /// Classify a segment as `WORD`, `SPACE` or `SYMBOL`.
    fn word_class(segment: &str) -> &'static str {
        if segment.chars().any(char::is_alphanumeric) {
            "WORD"
        } else if segment.chars().all(char::is_whitespace) {
            "SPACE"
        } else {
            "SYMBOL"
        }
    }
}

impl Engine for Tokenizer {
    fn tokenize(&mut self, text: &str) -> Result<Vec<RawToken>> {
        let mut tokens = Vec::new();
        let mut position = 0;

        for segment in text.split_word_bounds() {
            let class = Self::word_class(segment);
            let script = segment.chars().next().map(Script::of).unwrap_or(Script::Other);
            let kind = if class == "WORD" {
                TokenKind::Known
            } else {
                TokenKind::Unknown
            };

            tokens.push(
                RawToken::new(segment, position)
                    .with_features([class, script.as_str(), segment.to_lowercase().as_str()])
                    .with_kind(kind),
            );
            position += segment.chars().count();
        }

        Ok(tokens)
    }
}

impl EngineType for Tokenizer {
    type Fields = DictionaryField;

    fn create() -> Result<Self> {
        Ok(Tokenizer::new())
    }
}
