//! Japanese morphological analysis with the UniDic dictionary.

use crate::engine::lindera::LinderaSegmenter;
use crate::engine::{Engine, EngineType, FeatureFields, RawToken};
use crate::error::Result;

/// Feature slots of UniDic entries.
pub struct DictionaryField;

impl DictionaryField {
    pub const PART_OF_SPEECH_LEVEL_1: i32 = 0;
    pub const PART_OF_SPEECH_LEVEL_2: i32 = 1;
    pub const PART_OF_SPEECH_LEVEL_3: i32 = 2;
    pub const PART_OF_SPEECH_LEVEL_4: i32 = 3;
    pub const CONJUGATION_TYPE: i32 = 4;
    pub const CONJUGATION_FORM: i32 = 5;
    pub const LEMMA_READING: i32 = 6;
    pub const LEMMA: i32 = 7;
    pub const ORTHOGRAPHIC_SURFACE_FORM: i32 = 8;
    pub const PRONUNCIATION: i32 = 9;
    pub const ORTHOGRAPHIC_BASE_FORM: i32 = 10;
    pub const PRONUNCIATION_BASE_FORM: i32 = 11;
    pub const LANGUAGE_TYPE: i32 = 12;
    pub const INITIAL_SOUND_ALTERATION_TYPE: i32 = 13;
    pub const INITIAL_SOUND_ALTERATION_FORM: i32 = 14;
    pub const FINAL_SOUND_ALTERATION_TYPE: i32 = 15;
    pub const FINAL_SOUND_ALTERATION_FORM: i32 = 16;
}

impl FeatureFields for DictionaryField {
    const FIELDS: &'static [(&'static str, i32)] = &[
        ("PART_OF_SPEECH_LEVEL_1", Self::PART_OF_SPEECH_LEVEL_1),
        ("PART_OF_SPEECH_LEVEL_2", Self::PART_OF_SPEECH_LEVEL_2),
        ("PART_OF_SPEECH_LEVEL_3", Self::PART_OF_SPEECH_LEVEL_3),
        ("PART_OF_SPEECH_LEVEL_4", Self::PART_OF_SPEECH_LEVEL_4),
        ("CONJUGATION_TYPE", Self::CONJUGATION_TYPE),
        ("CONJUGATION_FORM", Self::CONJUGATION_FORM),
        ("LEMMA_READING", Self::LEMMA_READING),
        ("LEMMA", Self::LEMMA),
        ("ORTHOGRAPHIC_SURFACE_FORM", Self::ORTHOGRAPHIC_SURFACE_FORM),
        ("PRONUNCIATION", Self::PRONUNCIATION),
        ("ORTHOGRAPHIC_BASE_FORM", Self::ORTHOGRAPHIC_BASE_FORM),
        ("PRONUNCIATION_BASE_FORM", Self::PRONUNCIATION_BASE_FORM),
        ("LANGUAGE_TYPE", Self::LANGUAGE_TYPE),
        (
            "INITIAL_SOUND_ALTERATION_TYPE",
            Self::INITIAL_SOUND_ALTERATION_TYPE,
        ),
        (
            "INITIAL_SOUND_ALTERATION_FORM",
            Self::INITIAL_SOUND_ALTERATION_FORM,
        ),
        ("FINAL_SOUND_ALTERATION_TYPE", Self::FINAL_SOUND_ALTERATION_TYPE),
        ("FINAL_SOUND_ALTERATION_FORM", Self::FINAL_SOUND_ALTERATION_FORM),
    ];
}

/// Lindera engine backed by the embedded UniDic dictionary.
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
            inner: LinderaSegmenter::load("embedded://unidic")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_japanese() {
        let mut tokenizer = Tokenizer::create().unwrap();
        let text = "日本語の形態素解析を行うことができます。";
        let tokens = tokenizer.tokenize(text).unwrap();

        assert_eq!(tokens.len(), 13);
        assert_eq!(tokens[0].surface, "日本");
        assert_eq!(tokens[5].surface, "解析");
        let joined: String = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(joined, text);
    }
}
