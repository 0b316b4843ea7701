//! Async API for non-blocking conversions.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! mddocx = { version = "0.1", features = ["async"] }
//! ```

use crate::config::DocConfig;
use crate::convert::{save_async, ConvertOptions, ConvertResult, Converter};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Asynchronously loads a document configuration.
///
/// The document-type tag is taken from the file stem, as with
/// [`DocConfig::from_path`].
pub async fn load_config(path: impl AsRef<Path>) -> Result<DocConfig> {
    let path = path.as_ref();
    let json = match fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ConfigNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let config = DocConfig::from_json(&json).map_err(|e| match e {
        Error::ConfigParse { message, .. } => Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    Ok(match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => config.with_doc_type(stem),
        None => config,
    })
}

/// Asynchronously converts a document.
///
/// Scanning is CPU-bound and runs on a blocking task; the save is a real
/// async write.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> mddocx::Result<()> {
/// use mddocx::convert::{ConvertOptions, Converter};
/// use std::sync::Arc;
///
/// let converter = Arc::new(Converter::new(ConvertOptions::new(".")));
/// let config = mddocx::async_api::load_config("doc-configs/payment-api.json").await?;
/// let result = mddocx::async_api::convert(converter, config).await?;
/// println!("{}", result.output_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn convert(converter: Arc<Converter>, config: DocConfig) -> Result<ConvertResult> {
    let rendered = tokio::task::spawn_blocking(move || converter.render(&config))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))??;

    save_async(&rendered.bytes, &rendered.output_path).await?;
    log::info!("Saved {}", rendered.output_path.display());

    Ok(ConvertResult {
        output_path: rendered.output_path,
        stats: rendered.stats,
        warnings: rendered.warnings,
    })
}

/// Asynchronously loads a configuration file and converts it with default
/// options rooted at `project_root`.
pub async fn convert_file(
    config_path: impl AsRef<Path>,
    project_root: impl Into<PathBuf>,
) -> Result<ConvertResult> {
    let config = load_config(config_path).await?;
    let converter = Arc::new(Converter::new(ConvertOptions::new(project_root)));
    convert(converter, config).await
}
