//! JSON backend: the element tree plus the resolved theme.

use super::DocumentBuilder;
use crate::config::DocInfo;
use crate::error::{Error, Result};
use crate::model::{CodeKind, CoverPage, Element, ImageBlock, TableBlock, TextStyle};
use crate::theme::Theme;
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    generator: &'static str,
    generated_at: String,
    info: &'a DocInfo,
    theme: &'a Theme,
    elements: &'a [Element],
}

/// Builder that records elements and serializes them as JSON.
#[derive(Debug, Clone)]
pub struct JsonBuilder {
    theme: Theme,
    format: JsonFormat,
    elements: Vec<Element>,
}

impl JsonBuilder {
    /// Create a builder with a resolved theme.
    pub fn new(theme: &Theme) -> Self {
        Self {
            theme: theme.clone(),
            format: JsonFormat::default(),
            elements: Vec::new(),
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Elements recorded so far.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl DocumentBuilder for JsonBuilder {
    fn heading(&mut self, level: u8, text: &str) {
        self.elements.push(Element::heading(level, text));
    }

    fn text(&mut self, text: &str, style: &TextStyle) {
        self.elements.push(Element::Paragraph {
            text: text.to_string(),
            style: *style,
        });
    }

    fn label_text(&mut self, label: &str, content: &str) {
        self.elements.push(Element::LabelText {
            label: label.to_string(),
            content: content.to_string(),
        });
    }

    fn bullet(&mut self, text: &str) {
        self.elements.push(Element::Bullet { text: text.into() });
    }

    fn info_box(&mut self, text: &str) {
        self.elements.push(Element::InfoBox { text: text.into() });
    }

    fn warning_box(&mut self, text: &str) {
        self.elements.push(Element::WarningBox { text: text.into() });
    }

    fn flow_box(&mut self, lines: &[String]) {
        self.elements.push(Element::FlowBox {
            lines: lines.to_vec(),
        });
    }

    fn page_break(&mut self) {
        self.elements.push(Element::PageBreak);
    }

    fn spacer(&mut self, before: u32) {
        self.elements.push(Element::spacer(before));
    }

    fn code_block(&mut self, kind: CodeKind, lines: &[String]) {
        self.elements.push(Element::CodeBlock {
            kind,
            lines: lines.to_vec(),
        });
    }

    fn table(&mut self, table: &TableBlock) {
        self.elements.push(Element::Table(table.clone()));
    }

    fn image(&mut self, image: &ImageBlock) -> Result<()> {
        self.elements.push(Element::Image(image.clone()));
        Ok(())
    }

    fn cover_page(&mut self, cover: &CoverPage) -> Result<()> {
        self.elements.push(Element::Cover(cover.clone()));
        Ok(())
    }

    fn finish(&mut self, info: &DocInfo) -> Result<Vec<u8>> {
        let doc = JsonDocument {
            generator: concat!("mddocx ", env!("CARGO_PKG_VERSION")),
            generated_at: chrono::Utc::now().to_rfc3339(),
            info,
            theme: &self.theme,
            elements: &self.elements,
        };

        let result = match self.format {
            JsonFormat::Pretty => serde_json::to_vec_pretty(&doc),
            JsonFormat::Compact => serde_json::to_vec(&doc),
        };

        result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_finish_pretty() {
        let mut theme = Theme::new();
        theme
            .colors
            .insert("primary".into(), Value::String("1F4E79".into()));
        let mut builder = JsonBuilder::new(&theme);
        builder.heading(2, "개요");
        builder.page_break();

        let info = DocInfo {
            title: Some("Test".into()),
            ..Default::default()
        };
        let bytes = builder.finish(&info).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["info"]["title"], "Test");
        assert_eq!(json["theme"]["colors"]["primary"], "1F4E79");
        assert_eq!(json["elements"][0]["type"], "heading");
        assert_eq!(json["elements"][1]["type"], "page_break");
        assert!(bytes.contains(&b'\n'));
    }

    #[test]
    fn test_finish_compact() {
        let mut builder = JsonBuilder::new(&Theme::new()).with_format(JsonFormat::Compact);
        builder.spacer(100);
        let bytes = builder.finish(&DocInfo::default()).unwrap();
        assert!(!bytes.contains(&b'\n'));
        assert_eq!(builder.elements().len(), 1);
    }
}
