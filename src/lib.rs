//! # mddocx
//!
//! Configuration-driven conversion of structured Markdown into formatted
//! documents.
//!
//! A per-document JSON configuration names the source, output, template and
//! theme, and carries every page-break, image and table-width override, so a
//! new document needs a new configuration file rather than new code.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mddocx::{convert_file, ConvertOptions};
//!
//! fn main() -> mddocx::Result<()> {
//!     let result = convert_file("doc-configs/payment-api.json", ConvertOptions::new("."))?;
//!     println!("Saved {}", result.output_path.display());
//!     for warning in &result.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Preprocess**: NFC normalization and header removal
//! - **Scan**: one forward pass classifying each line and emitting elements
//! - **Layout**: page-break policy and table column widths, decided during the scan
//! - **Assemble**: cover page plus body, walked through a [`render::DocumentBuilder`]

pub mod config;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod scan;
pub mod theme;
pub mod warnings;

#[cfg(feature = "async")]
pub mod async_api;

// Re-export commonly used types
pub use config::{DocConfig, DocInfo, ImageEntry, ImageOptions, PageBreakOptions};
pub use convert::{ConvertOptions, ConvertResult, Converter, TemplateRegistry};
pub use error::{Error, Result};
pub use layout::{resolve_widths, PageBreakPolicy, PatternCache, ScanState, WidthResolver};
pub use model::{Document, Element};
pub use render::{ConversionStats, DocumentBuilder, JsonBuilder, TextBuilder};
pub use scan::{classify, LineStream, Rule, Scanner};
pub use theme::Theme;
pub use warnings::Warnings;

use std::path::Path;

/// Load a configuration file and convert it.
///
/// # Example
///
/// ```no_run
/// use mddocx::{convert_file, ConvertOptions};
///
/// let result = convert_file("doc-configs/api.json", ConvertOptions::new(".")).unwrap();
/// println!("{} tables", result.stats.table_count);
/// ```
pub fn convert_file<P: AsRef<Path>>(config_path: P, options: ConvertOptions) -> Result<ConvertResult> {
    let config = DocConfig::from_path(config_path)?;
    Converter::new(options).convert(&config)
}

/// Convert markdown text to body elements without a cover page.
///
/// Image files and the shared width pattern file (`patterns.json`) are looked
/// up under `project_root`.
///
/// # Example
///
/// ```
/// use mddocx::{markdown_to_elements, DocConfig, Element};
///
/// let config = DocConfig::new("doc.md", "out.json");
/// let elements = markdown_to_elements("## 개요\n본문", &config, ".").unwrap();
/// assert_eq!(elements[0], Element::heading(2, "개요"));
/// ```
pub fn markdown_to_elements<P: AsRef<Path>>(
    markdown: &str,
    config: &DocConfig,
    project_root: P,
) -> Result<Vec<Element>> {
    let root = project_root.as_ref();
    let text = scan::prepare_source(markdown, config)?;
    let patterns = PatternCache::new(root.join(layout::PATTERNS_FILE));
    Ok(Scanner::new(config, root)
        .with_patterns(&patterns)
        .scan(&text)
        .elements)
}

/// Render markdown text with a registered template, returning the bytes.
///
/// Shared width patterns are read from [`ConvertOptions::patterns_path`].
pub fn render_markdown(
    markdown: &str,
    config: &DocConfig,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let registry = TemplateRegistry::with_defaults();
    let template = config.template_name();
    if !registry.supports(template) {
        return Err(Error::UnknownTemplate(template.to_string()));
    }

    let patterns = PatternCache::new(options.patterns_path());
    let assembly = convert::assemble_text(config, markdown, options, &patterns)?;
    let mut builder = registry.create(template, &assembly.theme)?;
    render::build_document(builder.as_mut(), &assembly.document.elements)?;
    builder.finish(&assembly.document.info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_elements_cleans_header() {
        let config = DocConfig::new("doc.md", "out.json");
        let elements =
            markdown_to_elements("# 제목\n목차\n## 변경 이력\n본문", &config, ".").unwrap();
        assert_eq!(
            elements,
            vec![Element::heading(2, "변경 이력"), Element::paragraph("본문")]
        );
    }

    #[test]
    fn test_render_markdown_unknown_template() {
        let config = DocConfig::new("doc.md", "out.docx").with_template("professional");
        let err = render_markdown("본문", &config, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownTemplate(_)));
    }

    #[test]
    fn test_render_markdown_text() {
        let config = DocConfig::new("doc.md", "out.txt").with_template("text");
        let options = ConvertOptions::default().with_modified_date("2026-01-05");
        let bytes = render_markdown("## 변경 이력\n- 항목", &config, &options).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("최종 수정일: 2026-01-05"));
        assert!(text.contains("  • 항목"));
    }

    const METHOD_TABLE: &str = "## 변경 이력\n| Method | URL |\n|---|---|\n| POST | /pay |\n";

    fn write_common_patterns(root: &Path) {
        std::fs::write(
            root.join(layout::PATTERNS_FILE),
            r#"{"tableWidths": {"common": {"Method|URL": [2000, 10960]}}}"#,
        )
        .unwrap();
    }

    fn table_widths(elements: &[Element]) -> Vec<Vec<u32>> {
        elements
            .iter()
            .filter_map(|e| match e {
                Element::Table(t) => Some(t.widths.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_markdown_to_elements_uses_shared_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write_common_patterns(dir.path());
        let config = DocConfig::new("doc.md", "out.json");

        let elements = markdown_to_elements(METHOD_TABLE, &config, dir.path()).unwrap();
        assert_eq!(table_widths(&elements), vec![vec![2000, 10960]]);
    }

    #[test]
    fn test_render_markdown_uses_shared_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write_common_patterns(dir.path());
        let config = DocConfig::new("doc.md", "out.json");
        let options = ConvertOptions::new(dir.path());

        let bytes = render_markdown(METHOD_TABLE, &config, &options).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let table = json["elements"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["type"] == "table")
            .unwrap();
        assert_eq!(table["widths"], serde_json::json!([2000, 10960]));
    }

    #[test]
    fn test_invalid_clean_pattern_is_config_error() {
        let mut config = DocConfig::new("doc.md", "out.json");
        config.h1_clean_pattern = Some("[".into());
        let err = markdown_to_elements("본문", &config, ".").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
