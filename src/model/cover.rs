//! Cover page.

use crate::config::DocInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Label of the version row on the cover.
pub const VERSION_LABEL: &str = "버전";

/// Label of the modified-date row on the cover.
pub const MODIFIED_DATE_LABEL: &str = "최종 수정일";

/// A labelled row in the cover info table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverField {
    /// Row label
    pub label: String,
    /// Row value
    pub value: String,
}

impl CoverField {
    /// Create a field.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Title page content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverPage {
    /// Document title
    pub title: String,

    /// Subtitle line
    pub subtitle: Option<String>,

    /// Info table rows
    pub fields: Vec<CoverField>,

    /// Author line
    pub author: Option<String>,

    /// Logo image, if configured and present
    pub logo: Option<PathBuf>,
}

impl CoverPage {
    /// Build a cover page from document metadata.
    ///
    /// `modified_date` fills the date row when the metadata has none.
    pub fn from_info(info: &DocInfo, modified_date: &str) -> Self {
        let version = info.version.clone().unwrap_or_else(|| "v1.0".to_string());
        let date = info
            .modified_date
            .clone()
            .unwrap_or_else(|| modified_date.to_string());

        Self {
            title: info.title.clone().unwrap_or_default(),
            subtitle: info.subtitle.clone(),
            fields: vec![
                CoverField::new(VERSION_LABEL, version),
                CoverField::new(MODIFIED_DATE_LABEL, date),
            ],
            author: info.author.clone(),
            logo: None,
        }
    }

    /// Attach a logo.
    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Look up an info row by label.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}
