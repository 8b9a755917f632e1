//! Rendering layer: replaces math spans in composed text with typeset markup.

pub mod math;

pub use math::{create_typesetter, DisplayMode, MathBackend, Typesetter};

use crate::parser::{has_delimiter, scan, Delimiter, Segment};
use serde::Deserialize;
use tracing::warn;

/// Configuration for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Math typesetting backend.
    pub backend: MathBackend,
}

/// Renders composed text, typesetting every math span it finds.
///
/// Display spans (`$$...$$`) are substituted first; the inline pass
/// (`$...$`) then runs over that result. A span the engine rejects is left
/// exactly as written, delimiters included.
pub struct FormulaRenderer {
    typesetter: Box<dyn Typesetter>,
}

impl FormulaRenderer {
    /// Create a renderer for the configured backend.
    pub fn new(config: &RenderConfig) -> Self {
        Self::with_typesetter(create_typesetter(config.backend))
    }

    /// Create a renderer around a custom typesetting engine.
    pub fn with_typesetter(typesetter: Box<dyn Typesetter>) -> Self {
        Self { typesetter }
    }

    /// Render `text` to display markup. Never fails.
    pub fn render(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let displayed = self.substitute(text, Delimiter::Display);
        self.substitute(&displayed, Delimiter::Inline)
    }

    /// Head content (scripts, styles) the backend's markup depends on.
    pub fn head_content(&self) -> Option<String> {
        self.typesetter.head_content()
    }

    fn substitute(&self, text: &str, delimiter: Delimiter) -> String {
        if !has_delimiter(text) {
            return text.to_string();
        }

        let mode = match delimiter {
            Delimiter::Inline => DisplayMode::Inline,
            Delimiter::Display => DisplayMode::Display,
        };

        let mut output = String::with_capacity(text.len());
        for segment in scan(text, delimiter) {
            match segment {
                Segment::Text(t) => output.push_str(t),
                Segment::Math(span) => match self.typesetter.typeset(span.payload.trim(), mode) {
                    Ok(markup) => output.push_str(&neutralize_markers(&markup)),
                    Err(e) => {
                        warn!(
                            formula = span.payload,
                            display = matches!(mode, DisplayMode::Display),
                            error = %e,
                            "failed to typeset math span, keeping source"
                        );
                        output.push_str(span.source);
                    }
                },
            }
        }
        output
    }
}

impl Default for FormulaRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl std::fmt::Debug for FormulaRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormulaRenderer").finish_non_exhaustive()
    }
}

/// Typeset markup must not carry a live `$`, or a later pass would read it
/// as a delimiter.
fn neutralize_markers(markup: &str) -> String {
    markup.replace('$', "&#36;")
}

/// Render `text` with the default (MathML) backend.
pub fn render(text: &str) -> String {
    FormulaRenderer::default().render(text)
}

/// A render result memoized on the exact text it was produced from.
///
/// Holds a single entry; a field only ever needs the markup for its current
/// value.
#[derive(Debug, Default)]
pub struct RenderMemo {
    entry: Option<(String, String)>,
}

impl RenderMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the markup for `text`, rendering only when `text` changed.
    pub fn get(&mut self, renderer: &FormulaRenderer, text: &str) -> &str {
        let stale = !matches!(&self.entry, Some((key, _)) if key == text);
        if stale {
            self.entry = Some((text.to_string(), renderer.render(text)));
        }
        match &self.entry {
            Some((_, markup)) => markup,
            None => "",
        }
    }

    /// Drop the cached entry.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Deterministic typesetter for tests.

    use super::Typesetter;
    use crate::error::TypesetError;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Wraps inline payloads in `<i>` and display payloads in `<b>`.
    /// Rejects unbalanced braces and any payload containing `bad`.
    #[derive(Debug, Default, Clone)]
    pub struct StubTypesetter {
        pub calls: Rc<Cell<usize>>,
    }

    impl StubTypesetter {
        fn check(&self, latex: &str) -> Result<(), TypesetError> {
            self.calls.set(self.calls.get() + 1);
            let opens = latex.matches('{').count();
            let closes = latex.matches('}').count();
            if opens != closes {
                return Err(TypesetError::UnbalancedBraces);
            }
            if latex.contains("bad") {
                return Err(TypesetError::Malformed(latex.to_string()));
            }
            Ok(())
        }
    }

    impl Typesetter for StubTypesetter {
        fn render_inline(&self, latex: &str) -> Result<String, TypesetError> {
            self.check(latex)?;
            Ok(format!("<i>{latex}</i>"))
        }

        fn render_display(&self, latex: &str) -> Result<String, TypesetError> {
            self.check(latex)?;
            Ok(format!("<b>{latex}</b>"))
        }

        fn head_content(&self) -> Option<String> {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubTypesetter;
    use super::*;
    use pretty_assertions::assert_eq;

    fn stub_renderer() -> (FormulaRenderer, StubTypesetter) {
        let stub = StubTypesetter::default();
        (FormulaRenderer::with_typesetter(Box::new(stub.clone())), stub)
    }

    #[test]
    fn test_empty_and_plain_text() {
        let (renderer, stub) = stub_renderer();
        assert_eq!(renderer.render(""), "");
        assert_eq!(renderer.render("plain text, no math"), "plain text, no math");
        assert_eq!(stub.calls.get(), 0);
    }

    #[test]
    fn test_inline_and_display() {
        let (renderer, _) = stub_renderer();
        assert_eq!(
            renderer.render("Area: $\\pi r^2$ and $$ \\sum x $$ end"),
            "Area: <i>\\pi r^2</i> and <b>\\sum x</b> end"
        );
    }

    #[test]
    fn test_display_pass_runs_first() {
        let (renderer, _) = stub_renderer();
        assert_eq!(renderer.render("$$a$$b$"), "<b>a</b>b$");
        assert_eq!(renderer.render("$$a\nb$$"), "<b>a\nb</b>");
    }

    #[test]
    fn test_inline_does_not_cross_newline() {
        let (renderer, _) = stub_renderer();
        assert_eq!(renderer.render("$a\nb$"), "$a\nb$");
    }

    #[test]
    fn test_malformed_span_keeps_source() {
        let (renderer, _) = stub_renderer();
        assert_eq!(
            renderer.render("ok $x$ broken $\\frac{a$ tail"),
            "ok <i>x</i> broken $\\frac{a$ tail"
        );
    }

    #[test]
    fn test_failed_display_span_is_seen_by_inline_pass() {
        let (renderer, _) = stub_renderer();
        // `$$bad$$` survives the display pass; the inline pass then tries
        // `$bad$` inside it, which also fails.
        assert_eq!(renderer.render("$$bad$$"), "$$bad$$");
        assert_eq!(renderer.render("$$x{$$"), "$$x{$$");
    }

    #[test]
    fn test_output_has_no_bare_marker() {
        let (renderer, _) = stub_renderer();
        let once = renderer.render(r"cost: $\$5$");
        assert_eq!(once, r"cost: <i>\&#36;5</i>");
        assert_eq!(renderer.render(&once), once);
    }

    #[test]
    fn test_real_backends() {
        for backend in [MathBackend::MathML, MathBackend::KaTeX] {
            let renderer = FormulaRenderer::new(&RenderConfig { backend });
            let typeset = create_typesetter(backend).render_inline("\\pi r^2").unwrap();
            let out = renderer.render("Area: $\\pi r^2$");
            assert!(out.starts_with("Area: "));
            assert!(out.contains(&typeset.replace('$', "&#36;")));
            assert!(!out.contains('$'));

            let broken = renderer.render("x $\\frac{a$ y");
            assert_eq!(broken, "x $\\frac{a$ y");
        }
    }

    #[test]
    fn test_memo_renders_once_per_value() {
        let (renderer, stub) = stub_renderer();
        let mut memo = RenderMemo::new();
        assert_eq!(memo.get(&renderer, "$x$"), "<i>x</i>");
        assert_eq!(memo.get(&renderer, "$x$"), "<i>x</i>");
        assert_eq!(stub.calls.get(), 1);
        assert_eq!(memo.get(&renderer, "$y$"), "<i>y</i>");
        assert_eq!(stub.calls.get(), 2);
        memo.clear();
        memo.get(&renderer, "$y$");
        assert_eq!(stub.calls.get(), 3);
    }
}
