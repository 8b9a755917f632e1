//! TOML configuration for renderers, fields, and palettes.

use crate::error::{ConfigError, Result};
use crate::field::FieldConfig;
use crate::palette::{Palette, PaletteConfig};
use crate::render::{FormulaRenderer, RenderConfig};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration. Every section is optional.
///
/// ```toml
/// [render]
/// backend = "katex"
///
/// [field]
/// multiline = true
/// rows = 4
///
/// [[palette.category]]
/// name = "Custom"
/// symbols = [{ label = "ℝ", latex = "\\mathbb{R}", title = "Reals" }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub render: RenderConfig,
    pub field: FieldConfig,
    pub palette: PaletteConfig,
}

impl Config {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.field.validate()?;
        self.palette.categories()?;
        Ok(())
    }

    /// Build the renderer described by `[render]`.
    pub fn renderer(&self) -> FormulaRenderer {
        FormulaRenderer::new(&self.render)
    }

    /// Build the palette described by `[palette]`.
    pub fn palette(&self) -> std::result::Result<Palette, ConfigError> {
        Palette::from_config(&self.palette)
    }
}
