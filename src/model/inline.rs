//! Inline markup handling (`**bold**` and `` `code` ``).
//!
//! The scanner strips markup where the target construct has no room for it
//! (table cells, headings, labels) and leaves it in place for bullets and
//! flow lines, where builders resolve it with [`parse_inline`].

use serde::{Deserialize, Serialize};

/// Style of an inline span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Plain text
    Plain,
    /// `**bold**`
    Bold,
    /// `` `code` ``
    Code,
}

/// A run of uniformly styled inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Text without markup
    pub text: String,
    /// Span style
    pub kind: SpanKind,
}

impl Span {
    fn new(text: &str, kind: SpanKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
        }
    }
}

/// Split text into plain, bold and code spans.
///
/// Only well-formed, non-empty `**…**` and `` `…` `` pairs are resolved;
/// unmatched markers stay in the plain text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let found = if let Some(body) = rest.strip_prefix("**") {
            body.find("**")
                .filter(|end| *end > 0 && !body[..*end].contains('*'))
                .map(|end| (SpanKind::Bold, &body[..end], end + 4))
        } else if let Some(body) = rest.strip_prefix('`') {
            body.find('`')
                .filter(|end| *end > 0)
                .map(|end| (SpanKind::Code, &body[..end], end + 2))
        } else {
            None
        };

        match found {
            Some((kind, inner, consumed)) => {
                if plain_start < i {
                    spans.push(Span::new(&text[plain_start..i], SpanKind::Plain));
                }
                spans.push(Span::new(inner, kind));
                i += consumed;
                plain_start = i;
            }
            None => {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        spans.push(Span::new(&text[plain_start..], SpanKind::Plain));
    }
    spans
}

/// Remove `**` markers.
pub fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

/// Remove `**` and backtick markers.
pub fn strip_markup(text: &str) -> String {
    text.replace("**", "").replace('`', "")
}
