//! Theme resolution.
//!
//! A theme is four flat maps (`colors`, `fonts`, `sizes`, `syntax`). The
//! effective theme of a run is the named theme file with the document's
//! `style` block shallow-merged on top, resolved once before any element is
//! produced.

use crate::config::DocConfig;
use crate::error::{Error, Result};
use crate::warnings::Warnings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One flat theme category.
pub type ThemeMap = Map<String, Value>;

/// Theme categories that participate in the override merge.
pub const THEME_CATEGORIES: [&str; 4] = ["colors", "fonts", "sizes", "syntax"];

/// Resolved visual theme handed to builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Color hex codes by role (`primary`, `text`, `infoBox`, ...)
    #[serde(default)]
    pub colors: ThemeMap,

    /// Font families by role (`default`, `code`)
    #[serde(default)]
    pub fonts: ThemeMap,

    /// Font sizes in half-points by role (`title`, `h1`, `body`, ...)
    #[serde(default)]
    pub sizes: ThemeMap,

    /// Syntax highlighting colors by token class
    #[serde(default)]
    pub syntax: ThemeMap,
}

impl Theme {
    /// Create an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every category is empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.fonts.is_empty()
            && self.sizes.is_empty()
            && self.syntax.is_empty()
    }

    /// Look up a color.
    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key).and_then(Value::as_str)
    }

    /// Look up a font family.
    pub fn font(&self, key: &str) -> Option<&str> {
        self.fonts.get(key).and_then(Value::as_str)
    }

    /// Look up a size.
    pub fn size(&self, key: &str) -> Option<u64> {
        self.sizes.get(key).and_then(Value::as_u64)
    }

    /// Look up a syntax highlighting color.
    pub fn syntax_color(&self, key: &str) -> Option<&str> {
        self.syntax.get(key).and_then(Value::as_str)
    }

    /// Get a category by name.
    pub fn category(&self, name: &str) -> Option<&ThemeMap> {
        match name {
            "colors" => Some(&self.colors),
            "fonts" => Some(&self.fonts),
            "sizes" => Some(&self.sizes),
            "syntax" => Some(&self.syntax),
            _ => None,
        }
    }

    fn category_mut(&mut self, name: &str) -> Option<&mut ThemeMap> {
        match name {
            "colors" => Some(&mut self.colors),
            "fonts" => Some(&mut self.fonts),
            "sizes" => Some(&mut self.sizes),
            "syntax" => Some(&mut self.syntax),
            _ => None,
        }
    }

    /// Parse a theme file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Shallow-merge overrides on top of this theme; overrides win per key.
    pub fn merge(&mut self, overrides: &Theme) {
        for name in THEME_CATEGORIES {
            let (Some(base), Some(over)) = (self.category_mut(name), overrides.category(name))
            else {
                continue;
            };
            for (key, value) in over {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Load a theme file.
///
/// A missing or unparsable file yields an empty theme and a warning.
pub fn load_theme_file(path: &Path, warnings: &mut Warnings) -> Theme {
    if !path.exists() {
        warnings.push(format!("Theme file not found: {}", path.display()));
        return Theme::new();
    }

    match Theme::from_path(path) {
        Ok(theme) => theme,
        Err(e) => {
            warnings.push(format!("Ignoring theme file: {}", e));
            Theme::new()
        }
    }
}

/// Resolve the effective theme for a configuration.
///
/// Looks up `<project_root>/themes/<theme>.json` when a theme is named, then
/// applies the configuration's `style` overrides.
pub fn resolve_theme(config: &DocConfig, project_root: &Path, warnings: &mut Warnings) -> Theme {
    let mut theme = match config.theme.as_deref() {
        Some(name) => {
            let path = project_root.join("themes").join(format!("{}.json", name));
            load_theme_file(&path, warnings)
        }
        None => Theme::new(),
    };

    if let Some(ref style) = config.style {
        theme.merge(style);
    }

    theme
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme_from(value: Value) -> Theme {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_merge_override_wins_per_key() {
        let mut base = theme_from(json!({
            "colors": {"primary": "1B3664", "text": "333333"},
            "sizes": {"body": 20}
        }));
        let overrides = theme_from(json!({
            "colors": {"primary": "000000"},
            "fonts": {"default": "Noto Sans KR"}
        }));

        base.merge(&overrides);

        assert_eq!(base.color("primary"), Some("000000"));
        assert_eq!(base.color("text"), Some("333333"));
        assert_eq!(base.font("default"), Some("Noto Sans KR"));
        assert_eq!(base.size("body"), Some(20));
    }

    #[test]
    fn test_resolve_without_theme_uses_style_only() {
        let mut config = DocConfig::new("a.md", "a.docx");
        config.style = Some(theme_from(json!({"syntax": {"keyword": "569CD6"}})));

        let mut warnings = Warnings::new();
        let theme = resolve_theme(&config, Path::new("."), &mut warnings);

        assert!(warnings.is_empty());
        assert_eq!(theme.syntax_color("keyword"), Some("569CD6"));
        assert!(theme.colors.is_empty());
    }

    #[test]
    fn test_missing_theme_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DocConfig::new("a.md", "a.docx");
        config.theme = Some("navy".into());

        let mut warnings = Warnings::new();
        let theme = resolve_theme(&config, dir.path(), &mut warnings);

        assert!(theme.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings.iter().next().unwrap().contains("navy.json"));
    }

    #[test]
    fn test_unparsable_theme_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("themes")).unwrap();
        std::fs::write(dir.path().join("themes/broken.json"), "{ not json").unwrap();

        let mut config = DocConfig::new("a.md", "a.docx");
        config.theme = Some("broken".into());
        config.style = Some(theme_from(json!({"colors": {"accent": "F5A623"}})));

        let mut warnings = Warnings::new();
        let theme = resolve_theme(&config, dir.path(), &mut warnings);

        assert_eq!(warnings.len(), 1);
        assert!(warnings.iter().next().unwrap().contains("broken.json"));
        assert_eq!(theme.color("accent"), Some("F5A623"));

        let err = Theme::from_path(&dir.path().join("themes/broken.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_theme_file_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("themes")).unwrap();
        std::fs::write(
            dir.path().join("themes/navy.json"),
            r#"{"colors": {"primary": "1B3664"}, "fonts": {"code": "Consolas"}}"#,
        )
        .unwrap();

        let mut config = DocConfig::new("a.md", "a.docx");
        config.theme = Some("navy".into());

        let mut warnings = Warnings::new();
        let theme = resolve_theme(&config, dir.path(), &mut warnings);

        assert!(warnings.is_empty());
        assert_eq!(theme.color("primary"), Some("1B3664"));
        assert_eq!(theme.font("code"), Some("Consolas"));
    }
}
