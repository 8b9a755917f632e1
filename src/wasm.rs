//! WebAssembly bindings for JavaScript/TypeScript.
//!
//! # Usage (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { renderMath, paletteCategories, MathFieldBinding } from '@mathfield/wasm';
//!
//! await init();
//!
//! const html = renderMath('Area: $\\pi r^2$');
//!
//! const field = new MathFieldBinding(false, 3);
//! field.setValue(question.text);
//! field.onChange(value => question.text = value);
//! textarea.addEventListener('keyup', () =>
//!     field.keyUp(textarea.selectionStart, textarea.selectionEnd));
//! // From a palette button (with pointerdown preventDefault'ed):
//! field.insertAtCursor('$\\alpha$');
//! requestAnimationFrame(() => field.runPending());
//! ```

#![cfg(feature = "wasm")]

use crate::field::{
    Cursor, DisplayState, FieldConfig, FieldEvent, InputSurface, MathField, TaskQueue,
};
use crate::palette::Palette;
use crate::render::{FormulaRenderer, MathBackend, RenderConfig};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Render text with embedded `$...$` / `$$...$$` math to HTML.
///
/// `backend` is `"mathml"` (default) or `"katex"`.
#[wasm_bindgen(js_name = renderMath)]
pub fn render_math(text: &str, backend: Option<String>) -> Result<String, JsError> {
    let backend = match backend {
        Some(name) => name
            .parse::<MathBackend>()
            .map_err(|e| JsError::new(&e.to_string()))?,
        None => MathBackend::default(),
    };
    Ok(FormulaRenderer::new(&RenderConfig { backend }).render(text))
}

/// The built-in palette categories as plain JS objects.
#[wasm_bindgen(js_name = paletteCategories)]
pub fn palette_categories() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(Palette::new().categories())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Forwards deferred focus to JS callbacks.
struct JsSurface {
    focus: js_sys::Function,
    select: js_sys::Function,
}

impl InputSurface for JsSurface {
    fn focus(&mut self) {
        if let Err(e) = self.focus.call0(&JsValue::NULL) {
            tracing::warn!(error = ?e, "focus callback threw");
        }
    }

    fn set_selection(&mut self, value: &str, cursor: Cursor) {
        let (start, end) = cursor.to_utf16(value);
        let start = JsValue::from(start as u32);
        let end = JsValue::from(end as u32);
        if let Err(e) = self.select.call2(&JsValue::NULL, &start, &end) {
            tracing::warn!(error = ?e, "selection callback threw");
        }
    }
}

/// A math field driven by DOM events from JS.
#[wasm_bindgen]
pub struct MathFieldBinding {
    field: MathField,
    queue: TaskQueue,
}

#[wasm_bindgen]
impl MathFieldBinding {
    #[wasm_bindgen(constructor)]
    pub fn new(multiline: bool, rows: u16) -> MathFieldBinding {
        let queue = TaskQueue::new();
        let config = FieldConfig {
            multiline,
            rows,
            placeholder: None,
        };
        let field = MathField::new(
            &config,
            Rc::new(FormulaRenderer::default()),
            Rc::new(queue.clone()),
        );
        MathFieldBinding { field, queue }
    }

    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, value: String) {
        self.field.set_value(value);
    }

    pub fn value(&self) -> String {
        self.field.value()
    }

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.field.on_change(move |value| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(value)) {
                tracing::warn!(error = ?e, "change callback threw");
            }
        });
    }

    /// Attach the native input's focus and `setSelectionRange` callbacks.
    pub fn mount(&self, focus: js_sys::Function, select: js_sys::Function) {
        self.field
            .mount_surface(Box::new(JsSurface { focus, select }));
    }

    pub fn unmount(&self) {
        self.field.unmount_surface();
    }

    // Selection offsets from JS count UTF-16 code units.

    pub fn input(&self, value: String, start: usize, end: usize) {
        let selection = Cursor::from_utf16(&value, start, end);
        self.field.handle_event(FieldEvent::Input { value, selection });
    }

    pub fn select(&self, start: usize, end: usize) {
        let selection = self.selection(start, end);
        self.field.handle_event(FieldEvent::Select(selection));
    }

    pub fn click(&self, start: usize, end: usize) {
        let selection = self.selection(start, end);
        self.field.handle_event(FieldEvent::Click(selection));
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&self, start: usize, end: usize) {
        let selection = self.selection(start, end);
        self.field.handle_event(FieldEvent::KeyUp(selection));
    }

    pub fn focus(&self) {
        self.field.focus();
    }

    #[wasm_bindgen(js_name = focused)]
    pub fn focused_event(&self) {
        self.field.handle_event(FieldEvent::Focus);
    }

    pub fn blur(&self) {
        self.field.handle_event(FieldEvent::Blur);
    }

    #[wasm_bindgen(js_name = insertAtCursor)]
    pub fn insert_at_cursor(&self, fragment: &str) {
        self.field.insert_at_cursor(fragment);
    }

    /// Whether the field should show its rendered preview.
    #[wasm_bindgen(js_name = isPreview)]
    pub fn is_preview(&self) -> bool {
        self.field.display_state() == DisplayState::Preview
    }

    pub fn preview(&self) -> Option<String> {
        self.field.preview()
    }

    #[wasm_bindgen(js_name = livePreview)]
    pub fn live_preview(&self) -> Option<String> {
        self.field.live_preview()
    }

    /// Run deferred focus work; call after the DOM has committed.
    #[wasm_bindgen(js_name = runPending)]
    pub fn run_pending(&self) -> usize {
        self.queue.run_pending()
    }
}

impl MathFieldBinding {
    fn selection(&self, start: usize, end: usize) -> Cursor {
        Cursor::from_utf16(&self.field.value(), start, end)
    }
}
