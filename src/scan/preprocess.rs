//! Source preparation before scanning.
//!
//! The cover page already shows the title and metadata, so everything from
//! the H1 up to the first body section (by default `## 변경 이력`) is cut.

use crate::config::DocConfig;
use crate::error::{Error, Result};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Normalize text to NFC and drop a leading byte order mark.
///
/// Keyword matching (`처리 흐름`, `변경 상세`, width buckets) compares
/// composed Hangul, so decomposed input from some editors must be composed
/// first.
pub fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.nfc().collect()
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Remove the document header.
///
/// Without `h1_pattern` the text is cut from the start; otherwise from the
/// first match of `h1_pattern`. The cut ends right before the first match of
/// `until` that follows. If either match is missing the text is returned
/// unchanged.
pub fn clean_header(text: &str, h1_pattern: Option<&str>, until: &str) -> Result<String> {
    let until_re = compile(until)?;

    let start = match h1_pattern {
        Some(pattern) => match compile(pattern)?.find(text) {
            Some(m) => m,
            None => return Ok(text.to_string()),
        },
        None => match until_re.find(text) {
            Some(end) => return Ok(text[end.start()..].to_string()),
            None => return Ok(text.to_string()),
        },
    };

    match until_re.find_at(text, start.end()) {
        Some(end) => {
            let mut cleaned = String::with_capacity(text.len());
            cleaned.push_str(&text[..start.start()]);
            cleaned.push_str(&text[end.start()..]);
            Ok(cleaned)
        }
        None => Ok(text.to_string()),
    }
}

/// Normalize and clean a markdown source using the configuration's header
/// patterns.
pub fn prepare_source(text: &str, config: &DocConfig) -> Result<String> {
    let normalized = normalize(text);
    clean_header(
        &normalized,
        config.h1_clean_pattern.as_deref(),
        config.header_clean_until(),
    )
}
