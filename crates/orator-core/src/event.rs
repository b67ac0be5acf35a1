//! Change events consumed by the narration driver.
//!
//! The host shell's event source is reduced to a three-event vocabulary:
//! focus moved, window replaced, and the periodic tick that narrates
//! in-place value changes. Events travel over a bounded
//! `crossbeam-channel` queue owned by a single driver task.

use crossbeam_channel::{bounded, Receiver, Sender};

/// One observation from the host shell.
///
/// Events are consumed exactly once per driver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Keyboard/remote focus moved to another control.
    FocusChanged {
        /// The host's stable integer id for the newly focused control.
        control_id: i32,
    },
    /// The shell replaced the whole window or dialog.
    WindowChanged {
        /// The host's id for the window now on screen.
        window_id: i32,
    },
    /// Periodic poll; narrates value changes on the focused control.
    Tick,
}

impl ChangeEvent {
    /// Whether this event starts a new focus session.
    pub fn is_focus_change(&self) -> bool {
        matches!(self, Self::FocusChanged { .. } | Self::WindowChanged { .. })
    }

    /// Whether this event invalidates any in-flight pass for the
    /// previous window. Partial results for that window are dropped,
    /// never emitted.
    pub fn preempts(&self) -> bool {
        matches!(self, Self::WindowChanged { .. })
    }
}

/// Create the bounded change-event queue.
///
/// The sending half belongs to the host-shell glue; the receiving half
/// to the driver. The queue is bounded so a stalled driver applies
/// backpressure instead of buffering stale focus history.
pub fn change_event_channel(capacity: usize) -> (Sender<ChangeEvent>, Receiver<ChangeEvent>) {
    bounded(capacity)
}
