//! Math typesetting backends.

mod katex;
mod mathml;

pub use self::katex::KaTeXTypesetter;
pub use self::mathml::MathMLTypesetter;

use crate::error::TypesetError;
use serde::{Deserialize, Serialize};

/// Math typesetting backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Convert to MathML for native browser rendering.
    #[default]
    #[serde(alias = "MathML")]
    MathML,
    /// Output escaped LaTeX for KaTeX to render client-side.
    #[serde(alias = "KaTeX")]
    KaTeX,
}

impl std::str::FromStr for MathBackend {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mathml" => Ok(MathBackend::MathML),
            "katex" => Ok(MathBackend::KaTeX),
            other => Err(crate::error::ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Whether a formula is set inline with text or as its own block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Inline,
    Display,
}

/// A typesetting engine: formula source in, display markup out.
///
/// Implementations must be pure; the same input always yields the same
/// output or the same error.
pub trait Typesetter {
    /// Typeset inline math.
    fn render_inline(&self, latex: &str) -> Result<String, TypesetError>;

    /// Typeset display math.
    fn render_display(&self, latex: &str) -> Result<String, TypesetError>;

    /// Any HTML head content (scripts, styles) the output depends on.
    fn head_content(&self) -> Option<String>;

    /// Typeset in the given mode.
    fn typeset(&self, latex: &str, mode: DisplayMode) -> Result<String, TypesetError> {
        match mode {
            DisplayMode::Inline => self.render_inline(latex),
            DisplayMode::Display => self.render_display(latex),
        }
    }
}

/// Create a typesetter for the given backend.
pub fn create_typesetter(backend: MathBackend) -> Box<dyn Typesetter> {
    match backend {
        MathBackend::MathML => Box::new(MathMLTypesetter::new()),
        MathBackend::KaTeX => Box::new(KaTeXTypesetter::new()),
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
