//! Document-level types.

use super::Element;
use crate::config::DocInfo;
use serde::{Deserialize, Serialize};

/// An assembled document: metadata plus the ordered element list handed to a
/// builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub info: DocInfo,

    /// Elements in output order, cover page first when present
    pub elements: Vec<Element>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(info: DocInfo) -> Self {
        Self {
            info,
            elements: Vec::new(),
        }
    }

    /// Add an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Append elements.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over headings as `(level, text)`.
    pub fn headings(&self) -> impl Iterator<Item = (u8, &str)> {
        self.elements.iter().filter_map(|e| match e {
            Element::Heading { level, text } => Some((*level, text.as_str())),
            _ => None,
        })
    }

    /// Number of page breaks.
    pub fn page_break_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_page_break()).count()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(Element::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
