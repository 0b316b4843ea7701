//! Document assembly: theme, source preparation, scan and cover page.

use super::ConvertOptions;
use crate::config::{DocConfig, DocInfo};
use crate::error::{Error, Result};
use crate::layout::PatternCache;
use crate::model::{CoverPage, Document, Element};
use crate::render::ConversionStats;
use crate::scan::{prepare_source, Scanner};
use crate::theme::{resolve_theme, Theme};
use crate::warnings::Warnings;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to drive a builder.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Cover page followed by body elements
    pub document: Document,
    /// Resolved theme
    pub theme: Theme,
    /// Scan statistics
    pub stats: ConversionStats,
    /// Non-fatal problems from every stage
    pub warnings: Warnings,
}

/// Today's date as used on the cover when none is configured.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Fill metadata defaults: the modified date falls back to `date`.
pub fn effective_info(info: &DocInfo, date: &str) -> DocInfo {
    let mut info = info.clone();
    if info.modified_date.is_none() {
        info.modified_date = Some(date.to_string());
    }
    info
}

/// Build the cover page. A configured logo that does not exist is dropped
/// with a warning.
pub fn cover_page(
    info: &DocInfo,
    project_root: &Path,
    logo_path: Option<&str>,
    date: &str,
    warnings: &mut Warnings,
) -> CoverPage {
    let cover = CoverPage::from_info(info, date);
    match logo_path {
        Some(logo) => {
            let path = project_root.join(logo);
            if path.exists() {
                cover.with_logo(path)
            } else {
                warnings.push(format!("Logo file not found: {}", path.display()));
                cover
            }
        }
        None => cover,
    }
}

/// Read the markdown source named by the configuration.
pub fn read_source(config: &DocConfig, project_root: &Path) -> Result<String> {
    let path = project_root.join(&config.source);
    if !path.is_file() {
        return Err(Error::SourceNotFound(path));
    }
    Ok(fs::read_to_string(&path)?)
}

/// Assemble a document from markdown text that has already been read.
pub fn assemble_text(
    config: &DocConfig,
    markdown: &str,
    options: &ConvertOptions,
    patterns: &PatternCache,
) -> Result<Assembly> {
    let root = options.project_root();
    let mut warnings = Warnings::new();

    let text = prepare_source(markdown, config)?;
    let theme = resolve_theme(config, root, &mut warnings);

    let date = options
        .modified_date()
        .map_or_else(today, |d| d.to_string());
    let info = effective_info(&config.doc_info, &date);
    let cover = cover_page(
        &info,
        root,
        config.logo_path.as_deref(),
        &date,
        &mut warnings,
    );

    let scan = Scanner::new(config, root)
        .with_patterns(patterns)
        .with_table_width(options.table_width())
        .scan(&text);

    let mut document = Document::new(info);
    document.push(Element::Cover(cover));
    document.extend(scan.elements);

    warnings.extend(scan.warnings);
    let mut stats = scan.stats;
    stats.warning_count = warnings.len() as u32;

    Ok(Assembly {
        document,
        theme,
        stats,
        warnings,
    })
}

/// Read the source and assemble the document.
pub fn assemble(
    config: &DocConfig,
    options: &ConvertOptions,
    patterns: &PatternCache,
) -> Result<Assembly> {
    let markdown = read_source(config, options.project_root())?;
    assemble_text(config, &markdown, options, patterns)
}

/// Output path: `{version}` substituted, relative to the project root.
pub fn output_path(config: &DocConfig, project_root: &Path) -> PathBuf {
    project_root.join(config.output_file())
}

/// Write output bytes, creating parent directories.
pub fn save(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Write output bytes without blocking the runtime.
#[cfg(feature = "async")]
pub async fn save_async(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
