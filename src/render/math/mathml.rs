//! MathML typesetter backed by `pulldown-latex`.

use super::Typesetter;
use crate::error::TypesetError;
use pulldown_latex::{
    config::DisplayMode as LatexDisplayMode, config::RenderConfig, mathml::push_mathml, Parser,
    Storage,
};

/// Typesetter that converts LaTeX to MathML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMLTypesetter;

impl MathMLTypesetter {
    /// Create a new MathML typesetter.
    pub fn new() -> Self {
        Self
    }

    fn to_mathml(&self, latex: &str, display_mode: LatexDisplayMode) -> Result<String, TypesetError> {
        let storage = Storage::new();
        let parser = Parser::new(latex, &storage);
        let config = RenderConfig {
            display_mode,
            ..Default::default()
        };

        // Collect first so parse errors are reported instead of written.
        let events: Vec<_> = parser.collect();
        let errors: Vec<String> = events
            .iter()
            .filter_map(|e| e.as_ref().err().map(|err| err.to_string()))
            .collect();
        if !errors.is_empty() {
            return Err(TypesetError::Malformed(errors.join("; ")));
        }

        let mut mathml = String::new();
        push_mathml(&mut mathml, events.into_iter(), config)
            .map_err(|e| TypesetError::Engine(e.to_string()))?;
        Ok(mathml)
    }
}

impl Typesetter for MathMLTypesetter {
    fn render_inline(&self, latex: &str) -> Result<String, TypesetError> {
        let mathml = self.to_mathml(latex, LatexDisplayMode::Inline)?;
        Ok(format!(r#"<span class="math inline">{}</span>"#, mathml))
    }

    fn render_display(&self, latex: &str) -> Result<String, TypesetError> {
        let mathml = self.to_mathml(latex, LatexDisplayMode::Block)?;
        Ok(format!(r#"<div class="math display">{}</div>"#, mathml))
    }

    fn head_content(&self) -> Option<String> {
        Some(MATHML_STYLES.to_string())
    }
}

const MATHML_STYLES: &str = r#"<style>
div.math.display {
    text-align: center;
}
math {
    font-size: 1.1em;
}
</style>"#;
