//! Host-shell introspection interface.
//!
//! The narration core never talks to the media-center shell directly.
//! Everything it needs (visibility predicates, info-label expressions,
//! widget labels and values, the localized message catalog) comes
//! through the [`HostShell`] trait. Every method is fallible in the
//! degenerate sense: on any failure the host returns empty/false and
//! the caller falls through to its next search step.

use std::collections::HashMap;

use parking_lot::Mutex;

/// A value fetched from the host for one widget.
///
/// This is the full introspection surface for value narration; the
/// driver matches on it exhaustively rather than probing per-kind
/// accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetValue {
    /// The widget has no narratable value.
    #[default]
    None,
    /// Free text (edit contents, label2, a preformatted position).
    Text(String),
    /// A numeric position (slider, scrollbar, spin).
    Number(f64),
    /// An on/off state (radio button, toggle button).
    Toggle(bool),
    /// The visible item texts of a collection control.
    Items(Vec<String>),
    /// The selected entry of a collection control.
    Selected {
        /// Zero-based index of the selected item.
        index: usize,
        /// Total number of items.
        count: usize,
        /// The selected item's text.
        text: String,
    },
}

/// Introspection interface onto the running media-center shell.
///
/// Implementations wrap whatever scripting or IPC surface the host
/// exposes. All methods default to "nothing": narration degrades to
/// silence for the affected slot, it never crashes the add-on.
pub trait HostShell {
    /// Evaluate an opaque visibility predicate.
    fn is_visible(&self, _expr: &str) -> bool {
        false
    }

    /// Evaluate an opaque text expression (info labels and the like).
    fn eval_text(&self, _expr: &str) -> String {
        String::new()
    }

    /// Fetch the native label of a widget by its host control id.
    fn widget_label(&self, _control_id: i32) -> String {
        String::new()
    }

    /// Fetch the current value of a widget by its host control id.
    fn widget_value(&self, _control_id: i32) -> WidgetValue {
        WidgetValue::None
    }

    /// Resolve a message-catalog id to localized text.
    fn localize(&self, _message_id: u32) -> String {
        String::new()
    }
}

/// A host shell that answers every query with "nothing".
///
/// Useful as a placeholder while no shell is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostShell for NullHost {}

/// A scriptable host shell for tests and headless runs.
///
/// Answers are set up front; anything not scripted falls back to the
/// trait defaults (empty/false), which is exactly the failure mode the
/// resolution algorithms are written against.
#[derive(Debug, Default)]
pub struct StubHost {
    inner: Mutex<StubHostState>,
}

#[derive(Debug, Default)]
struct StubHostState {
    visibility: HashMap<String, bool>,
    text: HashMap<String, String>,
    labels: HashMap<i32, String>,
    values: HashMap<i32, WidgetValue>,
    messages: HashMap<u32, String>,
}

impl StubHost {
    /// Create a stub with no scripted answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a visibility predicate.
    pub fn set_visible(&self, expr: impl Into<String>, visible: bool) {
        self.inner.lock().visibility.insert(expr.into(), visible);
    }

    /// Script a text expression.
    pub fn set_text(&self, expr: impl Into<String>, text: impl Into<String>) {
        self.inner.lock().text.insert(expr.into(), text.into());
    }

    /// Script a widget's native label.
    pub fn set_label(&self, control_id: i32, label: impl Into<String>) {
        self.inner.lock().labels.insert(control_id, label.into());
    }

    /// Script a widget's current value.
    pub fn set_value(&self, control_id: i32, value: WidgetValue) {
        self.inner.lock().values.insert(control_id, value);
    }

    /// Script a message-catalog entry.
    pub fn set_message(&self, message_id: u32, text: impl Into<String>) {
        self.inner.lock().messages.insert(message_id, text.into());
    }
}

impl HostShell for StubHost {
    fn is_visible(&self, expr: &str) -> bool {
        self.inner.lock().visibility.get(expr).copied().unwrap_or(false)
    }

    fn eval_text(&self, expr: &str) -> String {
        self.inner.lock().text.get(expr).cloned().unwrap_or_default()
    }

    fn widget_label(&self, control_id: i32) -> String {
        self.inner.lock().labels.get(&control_id).cloned().unwrap_or_default()
    }

    fn widget_value(&self, control_id: i32) -> WidgetValue {
        self.inner.lock().values.get(&control_id).cloned().unwrap_or_default()
    }

    fn localize(&self, message_id: u32) -> String {
        self.inner.lock().messages.get(&message_id).cloned().unwrap_or_default()
    }
}
