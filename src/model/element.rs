//! Abstract document elements produced by the scanner.

use super::{CoverPage, TableBlock};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of a fenced code block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    /// Unhighlighted monospace text
    Plain,
    /// JSON payload
    Json,
    /// Source code with syntax highlighting
    #[default]
    Syntax,
}

/// Paragraph-level text styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Render the whole paragraph bold
    #[serde(default)]
    pub bold: bool,

    /// Extra space before the paragraph in twips
    #[serde(default)]
    pub spacing_before: Option<u32>,
}

impl TextStyle {
    /// Bold text with extra space before it (used for H5 headings).
    pub fn bold_with_spacing(spacing_before: u32) -> Self {
        Self {
            bold: true,
            spacing_before: Some(spacing_before),
        }
    }
}

/// An image placed in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Resolved file path
    pub path: PathBuf,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Section number the image is attached to
    pub section: Option<String>,
}

/// One output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// Heading, levels 1-4
    Heading {
        /// Heading level
        level: u8,
        /// Heading text
        text: String,
    },

    /// Body text
    Paragraph {
        /// Text content
        text: String,
        /// Styling
        #[serde(default)]
        style: TextStyle,
    },

    /// Bold label followed by regular text (`**라벨:** 내용`)
    LabelText {
        /// Label including the trailing colon
        label: String,
        /// Text after the label
        content: String,
    },

    /// Bullet item; inline markup is kept for the builder
    Bullet {
        /// Item text
        text: String,
    },

    /// Neutral call-out box
    InfoBox {
        /// Box text
        text: String,
    },

    /// Attention call-out box
    WarningBox {
        /// Box text
        text: String,
    },

    /// Processing-flow box; lines keep step, bullet and number markers
    FlowBox {
        /// Flow lines
        lines: Vec<String>,
    },

    /// Hard page break
    PageBreak,

    /// Vertical space
    Spacer {
        /// Space in twips
        before: u32,
    },

    /// Fenced code block
    CodeBlock {
        /// Rendering kind
        kind: CodeKind,
        /// Source lines
        lines: Vec<String>,
    },

    /// Table
    Table(TableBlock),

    /// Image
    Image(ImageBlock),

    /// Cover page
    Cover(CoverPage),
}

impl Element {
    /// Create a heading.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Element::Heading {
            level: level.clamp(1, 4),
            text: text.into(),
        }
    }

    /// Create an unstyled paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Element::Paragraph {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a spacer.
    pub fn spacer(before: u32) -> Self {
        Element::Spacer { before }
    }

    /// Short name of the element kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Heading { .. } => "heading",
            Element::Paragraph { .. } => "paragraph",
            Element::LabelText { .. } => "label_text",
            Element::Bullet { .. } => "bullet",
            Element::InfoBox { .. } => "info_box",
            Element::WarningBox { .. } => "warning_box",
            Element::FlowBox { .. } => "flow_box",
            Element::PageBreak => "page_break",
            Element::Spacer { .. } => "spacer",
            Element::CodeBlock { .. } => "code_block",
            Element::Table(_) => "table",
            Element::Image(_) => "image",
            Element::Cover(_) => "cover",
        }
    }

    /// Check if this is a heading of the given level.
    pub fn is_heading(&self, level: u8) -> bool {
        matches!(self, Element::Heading { level: l, .. } if *l == level)
    }

    /// Check if this is a page break.
    pub fn is_page_break(&self) -> bool {
        matches!(self, Element::PageBreak)
    }

    /// Text carried by the element, if any.
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Element::Heading { text, .. }
            | Element::Paragraph { text, .. }
            | Element::Bullet { text }
            | Element::InfoBox { text }
            | Element::WarningBox { text } => Some(text.clone()),
            Element::LabelText { label, content } if content.is_empty() => Some(label.clone()),
            Element::LabelText { label, content } => Some(format!("{} {}", label, content)),
            Element::FlowBox { lines } | Element::CodeBlock { lines, .. } => Some(lines.join("\n")),
            Element::Table(table) => Some(table.plain_text()),
            Element::PageBreak | Element::Spacer { .. } | Element::Image(_) | Element::Cover(_) => {
                None
            }
        }
    }
}
