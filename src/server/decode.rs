//! Request text decoding and trimming.
//!
//! Request text arrives percent-encoded in a caller-chosen charset. `+` stands
//! for a space, `%XX` escapes are collected into byte runs and decoded with the
//! requested charset, and everything else is taken literally.

use std::borrow::Cow;

use encoding_rs::Encoding;
use log::warn;

use crate::error::{PolydictError, Result};

/// Charset assumed when a request does not name one.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Decode percent-encoded `text` using the charset labelled `encoding`.
///
/// # Examples
///
/// ```
/// use polydict::server::decode::decode_text;
///
/// assert_eq!(decode_text("%E3%81%99%E3%82%82%E3%82%82", "utf-8").unwrap(), "すもも");
/// assert_eq!(decode_text("%82%B7%82%E0%82%E0", "shift_jis").unwrap(), "すもも");
/// assert_eq!(decode_text("a+b%21", "utf-8").unwrap(), "a b!");
/// assert!(decode_text("100%", "utf-8").is_err());
/// ```
pub fn decode_text(text: &str, encoding: &str) -> Result<String> {
    let charset = Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| PolydictError::decoding(format!("unsupported encoding '{encoding}'")))?;

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(|c: char| c == '%' || c == '+') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];

        if let Some(after) = rest.strip_prefix('+') {
            decoded.push(' ');
            rest = after;
            continue;
        }

        let run = escape_run_len(rest)?;
        let bytes = urlencoding::decode_binary(rest[..run].as_bytes());
        let chars = charset
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .ok_or_else(|| {
                PolydictError::decoding(format!(
                    "'{}' is not valid {}",
                    &rest[..run],
                    charset.name()
                ))
            })?;
        decoded.push_str(&chars);
        rest = &rest[run..];
    }
    decoded.push_str(rest);

    Ok(decoded)
}

/// Length in bytes of the run of `%XX` escapes at the start of `text`.
fn escape_run_len(text: &str) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut len = 0;

    while bytes.get(len) == Some(&b'%') {
        match (bytes.get(len + 1), bytes.get(len + 2)) {
            (Some(high), Some(low)) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() => {
                len += 3;
            }
            _ => {
                let fragment: String = text[len..].chars().take(3).collect();
                return Err(PolydictError::decoding(format!(
                    "malformed escape sequence '{fragment}'"
                )));
            }
        }
    }

    Ok(len)
}

/// Keep at most the first `max_length` characters of `text`.
///
/// Truncation is logged as a warning; it never fails.
pub fn trim_input(text: &str, max_length: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => {
            warn!(
                "Input length {} exceeds max length. Trimming to max length of {max_length}",
                text.chars().count()
            );
            Cow::Owned(text[..cut].to_string())
        }
        None => Cow::Borrowed(text),
    }
}
