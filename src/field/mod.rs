//! Math-aware text field.
//!
//! A [`MathField`] is a controlled text input: the embedder owns the
//! canonical value, pushes it in with [`MathField::set_value`], and hears
//! about edits through `on_change`. The field itself tracks the last native
//! selection and whether it is focused, and from those decides between a
//! rendered preview and raw editing.
//!
//! Insertions from a [`Palette`](crate::palette::Palette) go through a
//! [`MathFieldHandle`], which splices at the last *recorded* cursor rather
//! than at live focus: palette buttons take the pointer-down without moving
//! the caret, so the recorded selection is still the one the user made.

mod cursor;
mod scheduler;

pub use cursor::{splice, Cursor};
pub use scheduler::{Scheduler, Task, TaskHandle, TaskQueue};

use crate::error::ConfigError;
use crate::parser::has_delimiter;
use crate::render::{FormulaRenderer, RenderMemo};
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Field configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Use a multi-line text area instead of a single-line input.
    pub multiline: bool,
    /// Visible rows in multi-line mode.
    pub rows: u16,
    /// Hint shown while the value is empty.
    pub placeholder: Option<String>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            multiline: false,
            rows: 3,
            placeholder: None,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.multiline && self.rows == 0 {
            return Err(ConfigError::Field("multi-line field needs at least one row".into()));
        }
        Ok(())
    }

    pub fn mode(&self) -> FieldMode {
        if self.multiline {
            FieldMode::MultiLine {
                rows: self.rows.max(1),
            }
        } else {
            FieldMode::SingleLine
        }
    }
}

/// Layout of the underlying input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    SingleLine,
    MultiLine { rows: u16 },
}

/// What the field currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Rendered markup; the raw input is not mounted.
    Preview,
    /// The raw editable input.
    Editing,
}

/// Events forwarded from the native input.
///
/// Events that carry a selection report the native selection at the time
/// of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Input { value: String, selection: Cursor },
    Select(Cursor),
    Click(Cursor),
    KeyUp(Cursor),
    Focus,
    Blur,
}

/// The native editable element, as seen by the field.
pub trait InputSurface {
    /// Give the element real input focus.
    fn focus(&mut self);

    /// Move the native selection. `value` is the text `cursor` indexes
    /// into, for surfaces that count offsets in other units.
    fn set_selection(&mut self, value: &str, cursor: Cursor);
}

#[derive(Default)]
struct Callbacks {
    on_change: Option<Box<dyn FnMut(&str)>>,
    on_focus: Option<Box<dyn FnMut()>>,
    on_blur: Option<Box<dyn FnMut()>>,
    on_cursor_change: Option<Box<dyn FnMut(Cursor)>>,
}

struct State {
    value: String,
    cursor: Cursor,
    focused: bool,
    mode: FieldMode,
    placeholder: Option<String>,
    surface: Option<Box<dyn InputSurface>>,
    pending: Option<TaskHandle>,
    memo: RenderMemo,
}

impl State {
    fn display_state(&self) -> DisplayState {
        if !self.focused && !self.value.is_empty() && has_delimiter(&self.value) {
            DisplayState::Preview
        } else {
            DisplayState::Editing
        }
    }

    fn record_cursor(&mut self, selection: Cursor) -> Option<Cursor> {
        let cursor = selection.clamp(self.value.chars().count());
        if cursor == self.cursor {
            return None;
        }
        self.cursor = cursor;
        Some(cursor)
    }
}

struct Inner {
    state: RefCell<State>,
    callbacks: RefCell<Callbacks>,
    renderer: Rc<FormulaRenderer>,
    scheduler: Rc<dyn Scheduler>,
}

// Callbacks are taken out of their slot while they run, so a callback may
// call back into the field without a double borrow.
macro_rules! emit {
    ($inner:expr, $slot:ident $(, $arg:expr)*) => {{
        let callback = $inner.callbacks.borrow_mut().$slot.take();
        if let Some(mut callback) = callback {
            callback($($arg),*);
            let mut callbacks = $inner.callbacks.borrow_mut();
            if callbacks.$slot.is_none() {
                callbacks.$slot = Some(callback);
            }
        }
    }};
}

impl Inner {
    fn focus(self: &Rc<Self>) {
        self.state.borrow_mut().focused = true;
        trace!("focus requested");
        self.schedule_focus(None);
    }

    fn insert_at_cursor(self: &Rc<Self>, fragment: &str) {
        let (value, cursor) = {
            let mut state = self.state.borrow_mut();
            let (value, cursor) = splice(&state.value, state.cursor, fragment);
            state.value.clone_from(&value);
            state.cursor = cursor;
            state.focused = true;
            (value, cursor)
        };
        debug!(fragment, start = cursor.start, "inserted fragment at cursor");

        emit!(self, on_change, &value);
        emit!(self, on_cursor_change, cursor);
        self.schedule_focus(Some(cursor));
    }

    /// Apply native focus (and optionally a selection) on the next turn,
    /// replacing any earlier pending request.
    fn schedule_focus(self: &Rc<Self>, selection: Option<Cursor>) {
        let weak = Rc::downgrade(self);
        let handle = self.scheduler.schedule(Box::new(move || match weak.upgrade() {
            Some(inner) => inner.apply_focus(selection),
            None => trace!("field dropped before deferred focus ran"),
        }));

        let previous = self.state.borrow_mut().pending.replace(handle);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    fn apply_focus(&self, selection: Option<Cursor>) {
        let (surface, value) = {
            let mut state = self.state.borrow_mut();
            state.pending = None;
            (state.surface.take(), state.value.clone())
        };

        let Some(mut surface) = surface else {
            debug!("no input surface mounted, skipping deferred focus");
            return;
        };

        surface.focus();
        if let Some(cursor) = selection {
            surface.set_selection(&value, cursor);
        }

        let mut state = self.state.borrow_mut();
        if state.surface.is_none() {
            state.surface = Some(surface);
        }
    }

    fn cancel_pending(&self) {
        let pending = self.state.borrow_mut().pending.take();
        if let Some(pending) = pending {
            pending.cancel();
        }
    }

    fn teardown(&self) {
        self.cancel_pending();
        self.state.borrow_mut().surface = None;
    }
}

/// A math-aware text field.
///
/// Dropping the field cancels any deferred focus and releases the mounted
/// input surface; outstanding [`MathFieldHandle`]s become no-ops.
pub struct MathField {
    inner: Rc<Inner>,
}

impl MathField {
    pub fn new(
        config: &FieldConfig,
        renderer: Rc<FormulaRenderer>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let state = State {
            value: String::new(),
            cursor: Cursor::default(),
            focused: false,
            mode: config.mode(),
            placeholder: config.placeholder.clone(),
            surface: None,
            pending: None,
            memo: RenderMemo::new(),
        };

        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                callbacks: RefCell::new(Callbacks::default()),
                renderer,
                scheduler,
            }),
        }
    }

    /// An imperative handle for the parent (or a palette) to hold.
    pub fn handle(&self) -> MathFieldHandle {
        MathFieldHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn on_change(&self, callback: impl FnMut(&str) + 'static) {
        self.inner.callbacks.borrow_mut().on_change = Some(Box::new(callback));
    }

    pub fn on_focus(&self, callback: impl FnMut() + 'static) {
        self.inner.callbacks.borrow_mut().on_focus = Some(Box::new(callback));
    }

    pub fn on_blur(&self, callback: impl FnMut() + 'static) {
        self.inner.callbacks.borrow_mut().on_blur = Some(Box::new(callback));
    }

    pub fn on_cursor_change(&self, callback: impl FnMut(Cursor) + 'static) {
        self.inner.callbacks.borrow_mut().on_cursor_change = Some(Box::new(callback));
    }

    /// Push the canonical value from the owner. Does not emit `on_change`.
    ///
    /// Only the cursor (clamped to the new value) and the focus flag
    /// survive a reset.
    pub fn set_value(&self, value: impl Into<String>) {
        let mut state = self.inner.state.borrow_mut();
        state.value = value.into();
        let len = state.value.chars().count();
        state.cursor = state.cursor.clamp(len);
    }

    pub fn value(&self) -> String {
        self.inner.state.borrow().value.clone()
    }

    /// The last recorded cursor.
    pub fn cursor(&self) -> Cursor {
        self.inner.state.borrow().cursor
    }

    pub fn mode(&self) -> FieldMode {
        self.inner.state.borrow().mode
    }

    pub fn placeholder(&self) -> Option<String> {
        self.inner.state.borrow().placeholder.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.inner.state.borrow().focused
    }

    pub fn display_state(&self) -> DisplayState {
        self.inner.state.borrow().display_state()
    }

    /// Whether a deferred focus request is waiting to run.
    pub fn has_pending_focus(&self) -> bool {
        self.inner
            .state
            .borrow()
            .pending
            .as_ref()
            .is_some_and(|h| !h.is_cancelled())
    }

    /// Attach the native input. Call once the editing view is committed.
    pub fn mount_surface(&self, surface: Box<dyn InputSurface>) {
        self.inner.state.borrow_mut().surface = Some(surface);
    }

    /// Detach the native input, e.g. when switching to preview.
    pub fn unmount_surface(&self) {
        self.inner.state.borrow_mut().surface = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.borrow().surface.is_some()
    }

    /// Rendered markup for the preview state; `None` while editing.
    pub fn preview(&self) -> Option<String> {
        let mut state = self.inner.state.borrow_mut();
        if state.display_state() != DisplayState::Preview {
            return None;
        }
        let State { memo, value, .. } = &mut *state;
        Some(memo.get(&self.inner.renderer, value).to_string())
    }

    /// Live preview shown under a multi-line field whenever its value has a
    /// delimiter, focused or not.
    pub fn live_preview(&self) -> Option<String> {
        let mut state = self.inner.state.borrow_mut();
        if !matches!(state.mode, FieldMode::MultiLine { .. }) || !has_delimiter(&state.value) {
            return None;
        }
        let State { memo, value, .. } = &mut *state;
        Some(memo.get(&self.inner.renderer, value).to_string())
    }

    /// Switch to editing and focus the input on the next turn.
    pub fn focus(&self) {
        self.inner.focus();
    }

    /// Splice `fragment` over the recorded selection.
    pub fn insert_at_cursor(&self, fragment: &str) {
        self.inner.insert_at_cursor(fragment);
    }

    /// Feed a native event to the field.
    pub fn handle_event(&self, event: FieldEvent) {
        let editing = self.display_state() == DisplayState::Editing;

        match event {
            FieldEvent::Input { value, selection } => {
                if !editing {
                    trace!("input event while previewing, ignored");
                    return;
                }
                let moved = {
                    let mut state = self.inner.state.borrow_mut();
                    state.value = value.clone();
                    state.record_cursor(selection)
                };
                emit!(self.inner, on_change, &value);
                if let Some(cursor) = moved {
                    emit!(self.inner, on_cursor_change, cursor);
                }
            }
            FieldEvent::Click(_) if !editing => self.inner.focus(),
            FieldEvent::Select(selection)
            | FieldEvent::Click(selection)
            | FieldEvent::KeyUp(selection) => {
                if !editing {
                    return;
                }
                let moved = self.inner.state.borrow_mut().record_cursor(selection);
                if let Some(cursor) = moved {
                    emit!(self.inner, on_cursor_change, cursor);
                }
            }
            FieldEvent::Focus => {
                self.inner.state.borrow_mut().focused = true;
                emit!(self.inner, on_focus);
            }
            FieldEvent::Blur => {
                self.inner.state.borrow_mut().focused = false;
                debug!(state = ?self.display_state(), "field blurred");
                emit!(self.inner, on_blur);
            }
        }
    }

    /// Tear the field down explicitly. Same as dropping it.
    pub fn destroy(self) {}
}

impl Drop for MathField {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl std::fmt::Debug for MathField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("MathField")
            .field("value", &state.value)
            .field("cursor", &state.cursor)
            .field("focused", &state.focused)
            .field("mode", &state.mode)
            .finish_non_exhaustive()
    }
}

/// Imperative handle to a [`MathField`].
///
/// Holds a weak reference: once the field is gone every call is a no-op
/// and reports `false`/`None`.
#[derive(Clone)]
pub struct MathFieldHandle {
    inner: Weak<Inner>,
}

impl MathFieldHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Read the field's last recorded cursor.
    pub fn cursor(&self) -> Option<Cursor> {
        self.inner.upgrade().map(|inner| inner.state.borrow().cursor)
    }

    pub fn focus(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.focus();
                true
            }
            None => false,
        }
    }

    pub fn insert_at_cursor(&self, fragment: &str) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.insert_at_cursor(fragment);
                true
            }
            None => false,
        }
    }

    /// Cancel any deferred focus and unmount the input surface.
    ///
    /// The field keeps its value and stays usable; this is the hook for an
    /// embedder tearing down the view while the owner still holds the field.
    pub fn destroy(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.teardown();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for MathFieldHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathFieldHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
