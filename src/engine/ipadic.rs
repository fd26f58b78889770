//! Japanese morphological analysis with the IPADIC dictionary.

use crate::engine::lindera::LinderaSegmenter;
use crate::engine::{Engine, EngineType, FeatureFields, RawToken};
use crate::error::Result;

/// Feature slots of IPADIC entries.
pub struct DictionaryField;

impl DictionaryField {
    pub const PART_OF_SPEECH_LEVEL_1: i32 = 0;
    pub const PART_OF_SPEECH_LEVEL_2: i32 = 1;
    pub const PART_OF_SPEECH_LEVEL_3: i32 = 2;
    pub const PART_OF_SPEECH_LEVEL_4: i32 = 3;
    pub const CONJUGATION_TYPE: i32 = 4;
    pub const CONJUGATION_FORM: i32 = 5;
    pub const BASE_FORM: i32 = 6;
    pub const READING: i32 = 7;
    pub const PRONUNCIATION: i32 = 8;
}

impl FeatureFields for DictionaryField {
    const FIELDS: &'static [(&'static str, i32)] = &[
        ("PART_OF_SPEECH_LEVEL_1", Self::PART_OF_SPEECH_LEVEL_1),
        ("PART_OF_SPEECH_LEVEL_2", Self::PART_OF_SPEECH_LEVEL_2),
        ("PART_OF_SPEECH_LEVEL_3", Self::PART_OF_SPEECH_LEVEL_3),
        ("PART_OF_SPEECH_LEVEL_4", Self::PART_OF_SPEECH_LEVEL_4),
        ("CONJUGATION_TYPE", Self::CONJUGATION_TYPE),
        ("CONJUGATION_FORM", Self::CONJUGATION_FORM),
        ("BASE_FORM", Self::BASE_FORM),
        ("READING", Self::READING),
        ("PRONUNCIATION", Self::PRONUNCIATION),
    ];
}

/// Lindera engine backed by the embedded IPADIC dictionary.
pub struct Tokenizer {
    inner: LinderaSegmenter,
}

impl Engine for Tokenizer {
    fn tokenize(&mut self, text: &str) -> Result<Vec<RawToken>> {
        self.inner.segment(text)
    }
}

impl EngineType for Tokenizer {
    type Fields = DictionaryField;

    fn create() -> Result<Self> {
        Ok(Tokenizer {
            inner: LinderaSegmenter::load("embedded://ipadic")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_japanese() {
        let mut tokenizer = Tokenizer::create().unwrap();
        let tokens = tokenizer.tokenize("すもももももももものうち").unwrap();

        let surfaces: Vec<_> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(
            surfaces,
            vec!["すもも", "も", "もも", "も", "もも", "の", "うち"]
        );
        assert_eq!(tokens[0].features[0], "名詞");
        assert_eq!(tokens[2].position, 4);
    }
}
