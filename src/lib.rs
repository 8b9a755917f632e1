//! # mathfield
//!
//! LaTeX-aware text fields: render `$...$` / `$$...$$` math embedded in
//! free-form text, pick symbols from a categorised palette, and insert them
//! at the cursor the user left behind.
//!
//! ## Features
//!
//! - **Span rendering**: display `$$...$$` spans are typeset first, inline
//!   `$...$` spans second. A formula the engine rejects stays as its source.
//! - **Backends**: MathML via `pulldown-latex` (default) or KaTeX passthrough
//! - **Symbol palette**: built-in Greek, operator, relation, calculus, set and
//!   arrow symbols, extensible through TOML
//! - **Text field**: cursor tracking, cursor-preserving insertion, preview and
//!   editing states, deferred focus with cancellation
//!
//! ## Quick Start
//!
//! ```rust
//! use mathfield::render;
//!
//! let html = render("Area: $\\pi r^2$");
//! assert!(html.starts_with("Area: "));
//! assert!(html.contains("<math"));
//! ```
//!
//! ### A field with a palette
//!
//! ```rust
//! use std::rc::Rc;
//! use mathfield::{
//!     Cursor, FieldConfig, FieldEvent, FormulaRenderer, MathField, Palette, TaskQueue,
//! };
//!
//! let queue = TaskQueue::new();
//! let field = MathField::new(
//!     &FieldConfig::default(),
//!     Rc::new(FormulaRenderer::default()),
//!     Rc::new(queue.clone()),
//! );
//! field.handle_event(FieldEvent::Focus);
//! field.handle_event(FieldEvent::Input { value: "r = ".into(), selection: Cursor::caret(4) });
//!
//! let handle = field.handle();
//! let mut palette = Palette::new();
//! palette.on_select(move |fragment| {
//!     handle.insert_at_cursor(fragment);
//! });
//! palette.select(1, 8); // Greek, π
//!
//! assert_eq!(field.value(), "r = $\\pi$");
//! queue.run_pending(); // applies focus once the editing view is up
//! ```
//!
//! ## Configuration
//!
//! ```text
//! [render]
//! backend = "mathml"      # or "katex"
//!
//! [field]
//! multiline = true
//! rows = 4
//!
//! [[palette.category]]
//! name = "Custom"
//! symbols = [{ label = "ℝ", latex = "\\mathbb{R}", title = "Reals" }]
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through `tracing`; install a subscriber to see them.
//! Formulas that fail to typeset are reported at `warn` level.
//!
//! ## FFI
//!
//! A C-compatible FFI is always compiled; see the `ffi` module.
//!
//! ## Features
//!
//! - `wasm`: Enable WebAssembly bindings (requires `wasm-bindgen`)

pub mod api;
pub mod config;
pub mod error;
pub mod field;
pub mod palette;
pub mod parser;
pub mod render;
pub mod session;

// FFI module (always compiled for cdylib)
pub mod ffi;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use api::Envelope;
pub use config::Config;
pub use error::{ApiError, ConfigError, Error, Result, SessionError, TypesetError};
pub use field::{
    Cursor, DisplayState, FieldConfig, FieldEvent, FieldMode, InputSurface, MathField,
    MathFieldHandle, Scheduler, TaskHandle, TaskQueue,
};
pub use palette::{Palette, PointerDown, SymbolCategory, SymbolEntry};
pub use parser::{scan, Delimiter, MathSpan, Segment};
pub use render::{render, FormulaRenderer, MathBackend, RenderConfig, Typesetter};
pub use session::{Session, SessionContext, SessionStore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_plain_text_is_unchanged() {
        for text in ["", "hello", "multi\nline <b>text</b>", "100% sure"] {
            assert_eq!(render(text), text);
        }
    }

    #[test]
    fn test_display_math() {
        let html = render("before $$\\int_0^1 x\\,dx$$ after");
        assert!(html.contains("math display"));
        assert!(html.starts_with("before "));
        assert!(html.ends_with(" after"));
        assert!(!html.contains("$$"));
    }

    #[test]
    fn test_malformed_math_is_kept() {
        let html = render("bad: $\\frac{a$ good: $b$");
        assert!(html.contains("$\\frac{a$"));
        assert!(html.contains("math inline"));
    }

    #[test]
    fn test_end_to_end_field() {
        let field = MathField::new(
            &FieldConfig::default(),
            Rc::new(FormulaRenderer::default()),
            Rc::new(TaskQueue::new()),
        );
        field.set_value("Area: $\\pi r^2$");
        assert_eq!(field.display_state(), DisplayState::Preview);

        let preview = field.preview().unwrap();
        let typeset = render::create_typesetter(MathBackend::MathML)
            .render_inline("\\pi r^2")
            .unwrap();
        assert!(preview.starts_with("Area: "));
        assert!(preview.contains(&typeset.replace('$', "&#36;")));
    }

    #[test]
    fn test_config_driven_setup() {
        let config = Config::from_toml_str("[render]\nbackend = \"katex\"").unwrap();
        let renderer = config.renderer();
        assert!(renderer.render("$x$").contains(r"\(x\)"));
        assert!(renderer.head_content().unwrap().contains("katex"));
    }
}
