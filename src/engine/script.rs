//! Script-run engine.
//!
//! Splits text wherever the writing system changes: a run of hiragana, a run
//! of kanji, a run of Latin letters and so on each become one token. It has no
//! lexicon, which makes it a useful baseline dictionary and a predictable
//! engine for tests.
//!
//! # Examples
//!
//! ```
//! use polydict::engine::Engine;
//! use polydict::engine::script::Tokenizer;
//!
//! let mut engine = Tokenizer::new();
//! let tokens = engine.tokenize("Rustで書く").unwrap();
//!
//! let surfaces: Vec<_> = tokens.iter().map(|t| t.surface.as_str()).collect();
//! assert_eq!(surfaces, vec!["Rust", "で", "書", "く"]);
//! ```

use std::fmt;

use crate::engine::{Engine, EngineType, FeatureFields, RawToken, TokenKind};
use crate::error::Result;

/// Writing system of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Script {
    Hiragana,
    Katakana,
    Kanji,
    Hangul,
    Latin,
    Alphabetic,
    Digit,
    Whitespace,
    Punctuation,
    Other,
}

impl Script {
    /// Classify a single character.
    pub fn of(c: char) -> Script {
        match c {
            '\u{3040}'..='\u{309F}' => Script::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
                Script::Katakana
            }
            '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2B73F}'
            | '\u{2B740}'..='\u{2B81F}'
            | '\u{2B820}'..='\u{2CEAF}'
            | '\u{3005}' => Script::Kanji,
            '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' => Script::Hangul,
            c if c.is_whitespace() => Script::Whitespace,
            c if c.is_numeric() => Script::Digit,
            c if c.is_ascii_alphabetic() => Script::Latin,
            '\u{00C0}'..='\u{024F}' | '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}' => {
                Script::Latin
            }
            c if c.is_alphabetic() => Script::Alphabetic,
            c if c.is_ascii_punctuation() => Script::Punctuation,
            '\u{3000}'..='\u{303F}' | '\u{FF01}'..='\u{FF0F}' | '\u{FF1A}'..='\u{FF20}' => {
                Script::Punctuation
            }
            _ => Script::Other,
        }
    }

    /// Name used as the `SCRIPT` feature value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Script::Hiragana => "HIRAGANA",
            Script::Katakana => "KATAKANA",
            Script::Kanji => "KANJI",
            Script::Hangul => "HANGUL",
            Script::Latin => "LATIN",
            Script::Alphabetic => "ALPHABETIC",
            Script::Digit => "DIGIT",
            Script::Whitespace => "WHITESPACE",
            Script::Punctuation => "PUNCTUATION",
            Script::Other => "OTHER",
        }
    }

    /// Whether runs of this script count as words.
    pub fn is_word(&self) -> bool {
        !matches!(self, Script::Whitespace | Script::Punctuation | Script::Other)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature slots of the script engine.
pub struct DictionaryField;

impl DictionaryField {
    pub const SCRIPT: i32 = 0;
    pub const CHARACTER_COUNT: i32 = 1;
    pub const BYTE_OFFSET: i32 = 2;
}

impl FeatureFields for DictionaryField {
    const FIELDS: &'static [(&'static str, i32)] = &[
        ("SCRIPT", Self::SCRIPT),
        ("CHARACTER_COUNT", Self::CHARACTER_COUNT),
        ("BYTE_OFFSET", Self::BYTE_OFFSET),
    ];
}

/// An engine that splits text into same-script runs.
#[derive(Clone, Debug, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new script-run engine.
    pub fn new() -> Self {
        Tokenizer
    }

    fn run_token(
        text: &str,
        script: Script,
        position: usize,
        byte_start: usize,
        byte_end: usize,
        chars: usize,
    ) -> RawToken {
        let kind = if script.is_word() {
            TokenKind::Known
        } else {
            TokenKind::Unknown
        };

        RawToken::new(&text[byte_start..byte_end], position)
            .with_features([
                script.as_str().to_string(),
                chars.to_string(),
                byte_start.to_string(),
            ])
            .with_kind(kind)
    }
}

impl Engine for Tokenizer {
    fn tokenize(&mut self, text: &str) -> Result<Vec<RawToken>> {
        let mut tokens = Vec::new();
        // (script, char position, byte start, char count) of the open run
        let mut run: Option<(Script, usize, usize, usize)> = None;

        for (position, (byte_offset, c)) in text.char_indices().enumerate() {
            let script = Script::of(c);
            run = match run {
                Some((current, start, byte_start, chars)) if current == script => {
                    Some((current, start, byte_start, chars + 1))
                }
                Some((current, start, byte_start, chars)) => {
                    tokens.push(Self::run_token(
                        text,
                        current,
                        start,
                        byte_start,
                        byte_offset,
                        chars,
                    ));
                    Some((script, position, byte_offset, 1))
                }
                None => Some((script, position, byte_offset, 1)),
            };
        }

        if let Some((script, start, byte_start, chars)) = run {
            tokens.push(Self::run_token(
                text,
                script,
                start,
                byte_start,
                text.len(),
                chars,
            ));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_runs() {
        let mut engine = Tokenizer::new();
        let tokens = engine.tokenize("今日はRust 2024だ。").unwrap();

        let surfaces: Vec<_> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["今日", "は", "Rust", " ", "2024", "だ", "。"]);

        assert_eq!(tokens[2].position, 3);
        assert_eq!(tokens[2].features, vec!["LATIN", "4", "9"]);
        assert_eq!(tokens[3].kind, TokenKind::Unknown);
        assert_eq!(tokens[6].features[0], "PUNCTUATION");
    }

    #[test]
    fn test_single_run_reconstructs_input() {
        let mut engine = Tokenizer::new();
        let text = "すもももももももものうち";
        let tokens = engine.tokenize(text).unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].features[1], "12");
        let joined: String = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_empty_text() {
        let mut engine = Tokenizer::new();
        assert!(engine.tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_script_of() {
        assert_eq!(Script::of('ア'), Script::Katakana);
        assert_eq!(Script::of('ー'), Script::Katakana);
        assert_eq!(Script::of('々'), Script::Kanji);
        assert_eq!(Script::of('한'), Script::Hangul);
        assert_eq!(Script::of('é'), Script::Latin);
        assert_eq!(Script::of('Ж'), Script::Alphabetic);
        assert_eq!(Script::of('、'), Script::Punctuation);
    }
}
