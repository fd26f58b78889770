//! Shared Lindera segmenter plumbing for the IPADIC and UniDic engines.

use std::borrow::Cow;

use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;

use crate::engine::{RawToken, TokenKind};
use crate::error::{PolydictError, Result};

pub(crate) struct LinderaSegmenter {
    inner: Segmenter,
}

impl LinderaSegmenter {
    /// Load an embedded dictionary, e.g. `embedded://ipadic`.
    pub(crate) fn load(dict_uri: &str) -> Result<Self> {
        let dictionary = load_dictionary(dict_uri).map_err(|e| {
            PolydictError::other(format!("Failed to load dictionary {dict_uri}: {e}"))
        })?;

        Ok(Self {
            inner: Segmenter::new(Mode::Normal, dictionary, None),
        })
    }

    pub(crate) fn segment(&self, text: &str) -> Result<Vec<RawToken>> {
        let segmented = self
            .inner
            .segment(Cow::Borrowed(text))
            .map_err(|e| PolydictError::other(format!("Failed to segment text: {e}")))?;

        let mut tokens = Vec::with_capacity(segmented.len());
        for mut token in segmented {
            let position = text[..token.byte_start].chars().count();
            let kind = if token.word_id.is_unknown() {
                TokenKind::Unknown
            } else if token.word_id.is_system() {
                TokenKind::Known
            } else {
                TokenKind::UserDefined
            };
            let features: Vec<String> = token.details().iter().map(|d| d.to_string()).collect();

            tokens.push(
                RawToken::new(token.surface.as_ref(), position)
                    .with_features(features)
                    .with_kind(kind),
            );
        }

        Ok(tokens)
    }
}
