//! Document builder contract.
//!
//! A builder turns abstract elements into one output format. Every element
//! constructor is required, so a backend that forgets one does not compile.
//!
//! # Example
//!
//! ```
//! use mddocx::render::{build_document, DocumentBuilder, TextBuilder};
//! use mddocx::model::Element;
//! use mddocx::{DocInfo, Theme};
//!
//! let mut builder = TextBuilder::new(&Theme::new());
//! build_document(&mut builder, &[Element::heading(2, "개요")]).unwrap();
//! let bytes = builder.finish(&DocInfo::default()).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().contains("개요"));
//! ```

use crate::config::DocInfo;
use crate::error::Result;
use crate::model::{CodeKind, CoverPage, Element, ImageBlock, TableBlock, TextStyle};

/// Element constructors plus serialization for one output format.
pub trait DocumentBuilder: Send {
    /// Heading, levels 1-4.
    fn heading(&mut self, level: u8, text: &str);

    /// Body paragraph.
    fn text(&mut self, text: &str, style: &TextStyle);

    /// Bold label followed by regular text.
    fn label_text(&mut self, label: &str, content: &str);

    /// Bullet item; `text` may carry inline markup.
    fn bullet(&mut self, text: &str);

    /// Neutral call-out box.
    fn info_box(&mut self, text: &str);

    /// Attention call-out box.
    fn warning_box(&mut self, text: &str);

    /// Processing-flow box.
    fn flow_box(&mut self, lines: &[String]);

    /// Hard page break.
    fn page_break(&mut self);

    /// Vertical space in twips.
    fn spacer(&mut self, before: u32);

    /// Code block.
    fn code_block(&mut self, kind: CodeKind, lines: &[String]);

    /// Table with resolved column widths.
    fn table(&mut self, table: &TableBlock);

    /// Image; may read the file.
    fn image(&mut self, image: &ImageBlock) -> Result<()>;

    /// Cover page.
    fn cover_page(&mut self, cover: &CoverPage) -> Result<()>;

    /// Serialize everything built so far.
    fn finish(&mut self, info: &DocInfo) -> Result<Vec<u8>>;

    /// File extension of the serialized output, without the dot.
    fn extension(&self) -> &'static str;
}

/// Feed one element to a builder.
pub fn build_element(builder: &mut dyn DocumentBuilder, element: &Element) -> Result<()> {
    match element {
        Element::Heading { level, text } => builder.heading(*level, text),
        Element::Paragraph { text, style } => builder.text(text, style),
        Element::LabelText { label, content } => builder.label_text(label, content),
        Element::Bullet { text } => builder.bullet(text),
        Element::InfoBox { text } => builder.info_box(text),
        Element::WarningBox { text } => builder.warning_box(text),
        Element::FlowBox { lines } => builder.flow_box(lines),
        Element::PageBreak => builder.page_break(),
        Element::Spacer { before } => builder.spacer(*before),
        Element::CodeBlock { kind, lines } => builder.code_block(*kind, lines),
        Element::Table(table) => builder.table(table),
        Element::Image(image) => builder.image(image)?,
        Element::Cover(cover) => builder.cover_page(cover)?,
    }
    Ok(())
}

/// Feed elements to a builder in order.
pub fn build_document(builder: &mut dyn DocumentBuilder, elements: &[Element]) -> Result<()> {
    elements
        .iter()
        .try_for_each(|element| build_element(builder, element))
}
