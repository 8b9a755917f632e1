//! KaTeX passthrough typesetter.

use super::{escape_html, Typesetter};
use crate::error::TypesetError;

/// Typesetter that outputs escaped LaTeX for client-side KaTeX rendering.
///
/// KaTeX itself runs in the browser, so the only validation done here is
/// structural: balanced braces and no dangling backslash.
#[derive(Debug, Clone, Copy, Default)]
pub struct KaTeXTypesetter;

impl KaTeXTypesetter {
    /// Create a new KaTeX typesetter.
    pub fn new() -> Self {
        Self
    }
}

impl Typesetter for KaTeXTypesetter {
    fn render_inline(&self, latex: &str) -> Result<String, TypesetError> {
        validate(latex)?;
        Ok(format!(
            r#"<span class="math inline">\({}\)</span>"#,
            escape_html(latex)
        ))
    }

    fn render_display(&self, latex: &str) -> Result<String, TypesetError> {
        validate(latex)?;
        Ok(format!(
            r#"<div class="math display">\[{}\]</div>"#,
            escape_html(latex)
        ))
    }

    fn head_content(&self) -> Option<String> {
        Some(KATEX_HEAD.to_string())
    }
}

fn validate(latex: &str) -> Result<(), TypesetError> {
    let mut depth: usize = 0;
    let mut chars = latex.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // Control symbols like `\{` consume the next character.
                if chars.next().is_none() {
                    return Err(TypesetError::Malformed("trailing backslash".into()));
                }
            }
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(TypesetError::UnbalancedBraces)?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(TypesetError::UnbalancedBraces)
    }
}

const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {
        delimiters: [
            {left: '\\[', right: '\\]', display: true},
            {left: '\\(', right: '\\)', display: false}
        ]
    });"></script>"#;
