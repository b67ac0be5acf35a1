//! Per-focus-session narration state.
//!
//! One [`Session`] value is owned by the driver and threaded through by
//! reference; there is no module-level shared state. A session begins
//! at every focus or window change and records whether the focused
//! control has opted into fast polling (tick-time value narration).

/// Driver-owned state for the current focus session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    focus_session_id: u64,
    fast_poll: bool,
    value_voiced: bool,
}

impl Session {
    /// Create the initial session. Fast polling starts disabled, so
    /// only focus/window events are processed until a control that
    /// narrates without focus changes takes focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session for a focus or window change.
    ///
    /// Disables fast polling and forgets whether a value was voiced;
    /// the driver re-enables polling if the newly focused control
    /// supports change-without-focus narration.
    pub fn begin_focus(&mut self) {
        self.focus_session_id = self.focus_session_id.wrapping_add(1);
        self.fast_poll = false;
        self.value_voiced = false;
    }

    /// Opt the current session into tick-time value narration.
    pub fn enable_fast_poll(&mut self) {
        self.fast_poll = true;
    }

    /// Whether tick events are processed in this session.
    pub fn fast_poll(&self) -> bool {
        self.fast_poll
    }

    /// Monotonic id of the current focus session.
    pub fn focus_session_id(&self) -> u64 {
        self.focus_session_id
    }

    /// Record that a value statement was emitted this session.
    pub fn mark_value_voiced(&mut self) {
        self.value_voiced = true;
    }

    /// Whether the next value would be the first since the focus change.
    /// The first one interrupts; later tick values do not.
    pub fn first_value_pending(&self) -> bool {
        !self.value_voiced
    }
}
