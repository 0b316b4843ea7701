//! Conversion statistics.

use crate::model::Element;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Statistics collected during a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of source lines scanned
    pub line_count: u32,

    /// Number of headings emitted (cover excluded)
    pub heading_count: u32,

    /// Number of paragraphs and label texts emitted
    pub paragraph_count: u32,

    /// Number of bullet items emitted
    pub bullet_count: u32,

    /// Number of tables emitted
    pub table_count: u32,

    /// Number of images emitted
    pub image_count: u32,

    /// Number of code blocks emitted
    pub code_block_count: u32,

    /// Number of info, warning and flow boxes emitted
    pub box_count: u32,

    /// Number of page breaks emitted
    pub page_break_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,

    /// Number of warnings raised
    pub warning_count: u32,

    /// How often each scan rule fired, in first-use order
    #[serde(default)]
    pub rule_hits: IndexMap<String, u32>,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted element.
    pub fn record(&mut self, element: &Element) {
        match element {
            Element::Heading { .. } => self.heading_count += 1,
            Element::Paragraph { .. } | Element::LabelText { .. } => self.paragraph_count += 1,
            Element::Bullet { .. } => self.bullet_count += 1,
            Element::Table(_) => self.table_count += 1,
            Element::Image(_) => self.image_count += 1,
            Element::CodeBlock { .. } => self.code_block_count += 1,
            Element::InfoBox { .. } | Element::WarningBox { .. } | Element::FlowBox { .. } => {
                self.box_count += 1
            }
            Element::PageBreak => self.page_break_count += 1,
            Element::Spacer { .. } | Element::Cover(_) => {}
        }

        if let Some(text) = element.plain_text() {
            self.count_text(&text);
        }
    }

    /// Count one rule dispatch.
    pub fn record_rule(&mut self, name: &str) {
        *self.rule_hits.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Times a rule fired.
    pub fn rule_count(&self, name: &str) -> u32 {
        self.rule_hits.get(name).copied().unwrap_or(0)
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
