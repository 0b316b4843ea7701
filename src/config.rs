//! Per-document conversion configuration.
//!
//! A configuration file fully describes one conversion: where the markdown
//! lives, where the output goes, which template and theme to use, and every
//! page-break, image and table-width override. New documents need a new
//! configuration file, never new code.

use crate::error::{Error, Result};
use crate::layout::PatternMap;
use crate::theme::Theme;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default template when the configuration names none.
pub const DEFAULT_TEMPLATE: &str = "json";

/// Default end marker for header cleaning.
pub const DEFAULT_HEADER_CLEAN_UNTIL: &str = "## 변경 이력";

/// Default image size in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 780;
/// Default image height in pixels.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 500;

/// Immutable descriptor for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocConfig {
    /// Markdown source, relative to the project root
    pub source: String,

    /// Output path template, relative to the project root
    pub output: String,

    /// Registered template (builder) name
    #[serde(default)]
    pub template: Option<String>,

    /// Theme name, resolved to `themes/<name>.json`
    #[serde(default)]
    pub theme: Option<String>,

    /// Per-document theme overrides
    #[serde(default)]
    pub style: Option<Theme>,

    /// Cover page metadata
    #[serde(default)]
    pub doc_info: DocInfo,

    /// Page-break policy knobs
    #[serde(default)]
    pub page_breaks: PageBreakOptions,

    /// Image sections
    #[serde(default)]
    pub images: ImageOptions,

    /// Document-level table width patterns
    #[serde(default)]
    pub table_widths: PatternMap,

    /// Regex where header removal starts
    #[serde(default)]
    pub h1_clean_pattern: Option<String>,

    /// Regex where header removal stops
    #[serde(default)]
    pub header_clean_until: Option<String>,

    /// Cover logo, relative to the project root
    #[serde(default)]
    pub logo_path: Option<String>,

    /// Blockquote prefixes rendered as warning boxes
    #[serde(default = "default_attention_markers")]
    pub attention_markers: Vec<String>,

    /// Document-type tag, derived from the configuration file name
    #[serde(skip)]
    pub doc_type: Option<String>,
}

fn default_attention_markers() -> Vec<String> {
    vec!["주의".to_string(), "중요".to_string()]
}

impl DocConfig {
    /// Create a configuration with only the required fields set.
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            template: None,
            theme: None,
            style: None,
            doc_info: DocInfo::default(),
            page_breaks: PageBreakOptions::default(),
            images: ImageOptions::default(),
            table_widths: PatternMap::new(),
            h1_clean_pattern: None,
            header_clean_until: None,
            logo_path: None,
            attention_markers: default_attention_markers(),
            doc_type: None,
        }
    }

    /// Load a configuration file.
    ///
    /// The document-type tag is taken from the file stem, so
    /// `doc-configs/api-spec.json` selects the `api-spec` width overrides.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: DocConfig =
            serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.doc_type = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);

        Ok(config)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigParse {
            path: Default::default(),
            message: e.to_string(),
        })
    }

    /// Set the document-type tag.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the template name.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Template name, falling back to [`DEFAULT_TEMPLATE`].
    pub fn template_name(&self) -> &str {
        self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)
    }

    /// Output path with `{version}` substituted.
    pub fn output_file(&self) -> String {
        let version = self.doc_info.version.as_deref().unwrap_or("v1.0");
        self.output.replace("{version}", version)
    }

    /// End marker used when cleaning the document header.
    pub fn header_clean_until(&self) -> &str {
        self.header_clean_until
            .as_deref()
            .unwrap_or(DEFAULT_HEADER_CLEAN_UNTIL)
    }
}

/// Cover page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocInfo {
    /// Document title
    pub title: Option<String>,

    /// Subtitle line
    pub subtitle: Option<String>,

    /// Version label (also substituted into the output path)
    pub version: Option<String>,

    /// Last modification date as written on the cover
    pub modified_date: Option<String>,

    /// Author or owning team
    pub author: Option<String>,
}

/// Page-break policy knobs.
///
/// Defaults produce sensible breaks for documents that follow the usual
/// layout (change history first, then one chapter per H2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageBreakOptions {
    /// Break before the second H2 (the one following the change history)
    pub after_change_history: bool,

    /// Image H3 sections always start on a new page
    pub image_h3_always_break: bool,

    /// Break before `v… 변경 상세` H3 sections
    pub change_detail_h3_break: bool,

    /// H2 ordinal from which H2/H3 default breaks stop (0 = never)
    pub h2_break_before_section: u32,

    /// Explicit H2 titles to break before; authoritative when non-empty
    pub h2_sections: Vec<String>,

    /// H3 section numbers to break before
    pub h3_sections: Vec<String>,

    /// H3 section numbers never to break before
    pub no_break_h3_sections: Vec<String>,

    /// Break before every H3 except the first after an H2
    pub default_h3_break: bool,
}

impl Default for PageBreakOptions {
    fn default() -> Self {
        Self {
            after_change_history: true,
            image_h3_always_break: true,
            change_detail_h3_break: false,
            h2_break_before_section: 0,
            h2_sections: Vec::new(),
            h3_sections: Vec::new(),
            no_break_h3_sections: Vec::new(),
            default_h3_break: true,
        }
    }
}

/// Image section configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    /// Image directory relative to the project root
    #[serde(default)]
    pub base_path: Option<String>,

    /// H3 section number → image
    #[serde(default)]
    pub section_map: IndexMap<String, ImageEntry>,
}

/// An image attached to an H3 section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageEntry {
    /// Bare file name, default size
    File(String),

    /// File name with explicit size
    Sized {
        /// File name relative to the image base path
        file: String,
        /// Width in pixels
        #[serde(default)]
        width: Option<u32>,
        /// Height in pixels
        #[serde(default)]
        height: Option<u32>,
    },
}

impl ImageEntry {
    /// File name relative to the image base path.
    pub fn file(&self) -> &str {
        match self {
            ImageEntry::File(file) => file,
            ImageEntry::Sized { file, .. } => file,
        }
    }

    /// Size in pixels, falling back to 780×500.
    pub fn size(&self) -> (u32, u32) {
        match self {
            ImageEntry::File(_) => (DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_HEIGHT),
            ImageEntry::Sized { width, height, .. } => (
                width.unwrap_or(DEFAULT_IMAGE_WIDTH),
                height.unwrap_or(DEFAULT_IMAGE_HEIGHT),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = DocConfig::from_json(r#"{"source": "a.md", "output": "out/a.docx"}"#).unwrap();
        assert_eq!(config.source, "a.md");
        assert_eq!(config.template_name(), DEFAULT_TEMPLATE);
        assert!(config.page_breaks.after_change_history);
        assert!(config.page_breaks.default_h3_break);
        assert!(!config.page_breaks.change_detail_h3_break);
        assert_eq!(config.attention_markers, vec!["주의", "중요"]);
        assert_eq!(config.header_clean_until(), DEFAULT_HEADER_CLEAN_UNTIL);
    }

    #[test]
    fn test_missing_required_field() {
        let result = DocConfig::from_json(r#"{"source": "a.md"}"#);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_partial_page_breaks_keep_defaults() {
        let config = DocConfig::from_json(
            r#"{"source": "a.md", "output": "o.docx",
                "pageBreaks": {"h2Sections": ["개요"], "defaultH3Break": false}}"#,
        )
        .unwrap();
        assert_eq!(config.page_breaks.h2_sections, vec!["개요"]);
        assert!(!config.page_breaks.default_h3_break);
        assert!(config.page_breaks.image_h3_always_break);
    }

    #[test]
    fn test_image_entries() {
        let config = DocConfig::from_json(
            r#"{"source": "a.md", "output": "o.docx",
                "images": {"basePath": "img", "sectionMap": {
                    "3.1": "flow.png",
                    "3.2": {"file": "seq.png", "width": 600}
                }}}"#,
        )
        .unwrap();
        let map = &config.images.section_map;
        assert_eq!(map["3.1"].file(), "flow.png");
        assert_eq!(map["3.1"].size(), (780, 500));
        assert_eq!(map["3.2"].size(), (600, 500));
    }

    #[test]
    fn test_output_version_substitution() {
        let mut config = DocConfig::new("a.md", "output/api_{version}.docx");
        assert_eq!(config.output_file(), "output/api_v1.0.docx");
        config.doc_info.version = Some("v2.3".into());
        assert_eq!(config.output_file(), "output/api_v2.3.docx");
    }

    #[test]
    fn test_table_widths_keep_file_order() {
        let config = DocConfig::from_json(
            r#"{"source": "a.md", "output": "o.docx",
                "tableWidths": {"필드|타입": [1, 2], "No|설명": [3, 4]}}"#,
        )
        .unwrap();
        let keys: Vec<_> = config.table_widths.keys().cloned().collect();
        assert_eq!(keys, vec!["필드|타입", "No|설명"]);
    }
}
