//! Conversion pipeline and template registry.
//!
//! A [`Converter`] owns the template registry and the shared width-pattern
//! cache, so converting many documents loads `patterns.json` once.
//!
//! # Example
//!
//! ```no_run
//! use mddocx::convert::{ConvertOptions, Converter};
//! use mddocx::DocConfig;
//!
//! fn main() -> mddocx::Result<()> {
//!     let config = DocConfig::from_path("doc-configs/payment-api.json")?;
//!     let converter = Converter::new(ConvertOptions::new("."));
//!
//!     let result = converter.convert(&config)?;
//!     println!("{}", result.output_path.display());
//!     Ok(())
//! }
//! ```

mod assemble;

pub use assemble::{
    assemble, assemble_text, cover_page, effective_info, output_path, read_source, save, today,
    Assembly,
};

#[cfg(feature = "async")]
pub use assemble::save_async;

use crate::config::DocConfig;
use crate::error::{Error, Result};
use crate::layout::{PatternCache, DEFAULT_TOTAL_WIDTH, PATTERNS_FILE};
use crate::render::{build_document, ConversionStats, DocumentBuilder, JsonBuilder, TextBuilder};
use crate::theme::Theme;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Options shared by every conversion of a [`Converter`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory that relative config paths resolve against
    pub project_root: PathBuf,

    /// Shared pattern file; `<root>/patterns.json` when unset
    pub patterns_path: Option<PathBuf>,

    /// Total table width in DXA
    pub table_width: u32,

    /// Date used when the configuration has no modified date
    pub modified_date: Option<String>,
}

impl ConvertOptions {
    /// Create options for a project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            patterns_path: None,
            table_width: DEFAULT_TOTAL_WIDTH,
            modified_date: None,
        }
    }

    /// Set the shared pattern file.
    pub fn with_patterns_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.patterns_path = Some(path.into());
        self
    }

    /// Set the total table width.
    pub fn with_table_width(mut self, width: u32) -> Self {
        self.table_width = width;
        self
    }

    /// Set the fallback modified date.
    pub fn with_modified_date(mut self, date: impl Into<String>) -> Self {
        self.modified_date = Some(date.into());
        self
    }

    /// Project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Effective shared pattern file.
    pub fn patterns_path(&self) -> PathBuf {
        self.patterns_path
            .clone()
            .unwrap_or_else(|| self.project_root.join(PATTERNS_FILE))
    }

    /// Total table width.
    pub fn table_width(&self) -> u32 {
        self.table_width
    }

    /// Fallback modified date.
    pub fn modified_date(&self) -> Option<&str> {
        self.modified_date.as_deref()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Where the document was saved
    pub output_path: PathBuf,

    /// Conversion statistics
    pub stats: ConversionStats,

    /// Non-fatal problems, in the order they occurred
    pub warnings: Vec<String>,
}

impl ConvertResult {
    /// Check if the conversion raised no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Factory creating a builder for a resolved theme.
pub type BuilderFactory = fn(&Theme) -> Box<dyn DocumentBuilder>;

fn json_builder(theme: &Theme) -> Box<dyn DocumentBuilder> {
    Box::new(JsonBuilder::new(theme))
}

fn text_builder(theme: &Theme) -> Box<dyn DocumentBuilder> {
    Box::new(TextBuilder::new(theme))
}

/// Registry of builder factories by template name.
///
/// Names are case-insensitive.
#[derive(Clone)]
pub struct TemplateRegistry {
    factories: HashMap<String, BuilderFactory>,
}

impl TemplateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the bundled templates (`json`, `text`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("json", json_builder);
        registry.register("text", text_builder);
        registry
    }

    /// Register a factory, replacing any previous one of the same name.
    pub fn register(&mut self, name: &str, factory: BuilderFactory) {
        self.factories.insert(name.to_lowercase(), factory);
    }

    /// Get a factory by name.
    pub fn get(&self, name: &str) -> Option<BuilderFactory> {
        self.factories.get(&name.to_lowercase()).copied()
    }

    /// Check if a template is registered.
    pub fn supports(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Create a builder.
    pub fn create(&self, name: &str, theme: &Theme) -> Result<Box<dyn DocumentBuilder>> {
        let factory = self
            .get(name)
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))?;
        Ok(factory(theme))
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.names())
            .finish()
    }
}

/// Rendered output ready to be saved.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Serialized document
    pub bytes: Vec<u8>,
    /// Destination
    pub output_path: PathBuf,
    /// Conversion statistics
    pub stats: ConversionStats,
    /// Non-fatal problems
    pub warnings: Vec<String>,
}

impl Rendered {
    fn into_result(self) -> ConvertResult {
        ConvertResult {
            output_path: self.output_path,
            stats: self.stats,
            warnings: self.warnings,
        }
    }
}

/// Markdown to document converter.
#[derive(Debug)]
pub struct Converter {
    registry: TemplateRegistry,
    patterns: PatternCache,
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the bundled templates.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            registry: TemplateRegistry::with_defaults(),
            patterns: PatternCache::new(options.patterns_path()),
            options,
        }
    }

    /// Replace the template registry.
    pub fn with_registry(mut self, registry: TemplateRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use an already populated pattern cache.
    pub fn with_patterns(mut self, patterns: PatternCache) -> Self {
        self.patterns = patterns;
        self
    }

    /// Template registry.
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Mutable template registry, for registering custom backends.
    pub fn registry_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.registry
    }

    /// Shared pattern cache.
    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Assemble a document without rendering it.
    pub fn assemble(&self, config: &DocConfig) -> Result<Assembly> {
        assemble(config, &self.options, &self.patterns)
    }

    /// Assemble and render, without saving.
    pub fn render(&self, config: &DocConfig) -> Result<Rendered> {
        let template = config.template_name();
        if !self.registry.supports(template) {
            return Err(Error::UnknownTemplate(template.to_string()));
        }

        let source = self.options.project_root().join(&config.source);
        log::info!("Converting {} with template '{}'", source.display(), template);

        let assembly = self.assemble(config)?;
        let mut builder = self.registry.create(template, &assembly.theme)?;
        build_document(builder.as_mut(), &assembly.document.elements)?;
        let bytes = builder.finish(&assembly.document.info)?;

        Ok(Rendered {
            bytes,
            output_path: output_path(config, self.options.project_root()),
            stats: assembly.stats,
            warnings: assembly.warnings.into_vec(),
        })
    }

    /// Convert and save.
    pub fn convert(&self, config: &DocConfig) -> Result<ConvertResult> {
        let rendered = self.render(config)?;
        save(&rendered.bytes, &rendered.output_path)?;
        log::info!(
            "Saved {} ({} bytes, {} warning(s))",
            rendered.output_path.display(),
            rendered.bytes.len(),
            rendered.warnings.len()
        );
        Ok(rendered.into_result())
    }

    /// Convert and save without blocking the runtime on the write.
    #[cfg(feature = "async")]
    pub async fn convert_async(&self, config: &DocConfig) -> Result<ConvertResult> {
        let rendered = self.render(config)?;
        save_async(&rendered.bytes, &rendered.output_path).await?;
        log::info!("Saved {}", rendered.output_path.display());
        Ok(rendered.into_result())
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// Convert one configuration with default options rooted at `project_root`.
pub fn convert(config: &DocConfig, project_root: impl Into<PathBuf>) -> Result<ConvertResult> {
    Converter::new(ConvertOptions::new(project_root)).convert(config)
}
