//! The narration engine: the driver turning change events into speech.
//!
//! One [`Narrator`] owns the current window, the dedup cache, and the
//! focus session; a single task drives it from the change-event queue.
//! Each event runs one pass through a small state machine
//! (`Idle → Resolving → Emitting → Idle`): resolve the target's
//! heading and/or value, filter both through the dedup cache, and hand
//! the surviving statements atomically to the speech backend. A window
//! change arriving mid-pass abandons the pass; partial results for the
//! old window are dropped, never emitted.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{debug, trace, warn};

use orator_core::logging::targets;
use orator_core::{
    ChangeEvent, HostShell, OratorError, Result, Session, SpeechBackend, StatementKind,
    Statements, Utterance,
};

use crate::tree::ControlId;
use crate::window::Window;

mod dedup;

#[cfg(test)]
mod tests;

pub use dedup::DedupCache;

/// Produces a freshly built window when the shell changes windows.
///
/// Wraps the UI loader; the driver treats it as a black box and
/// discards the previous tree wholesale on every call.
pub trait TreeLoader {
    /// Build the window the shell just switched to.
    fn build(&self, window_id: i32) -> Result<Window>;
}

/// Where the driver is within one narration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassState {
    /// Waiting for an event.
    #[default]
    Idle,
    /// Resolving headings and values for the current event.
    Resolving,
    /// Handing the surviving statements to the speech backend.
    Emitting,
}

/// One resolved-but-uncommitted narration pass.
///
/// The dedup cache is only updated from a pass that survives to
/// emission, so abandoning a `Pass` has no side effects.
#[derive(Debug, Default)]
struct Pass {
    target: Option<ControlId>,
    heading: Option<String>,
    value: Option<String>,
    statements: Statements,
}

impl Pass {
    fn empty() -> Self {
        Self::default()
    }
}

/// The narration driver.
pub struct Narrator {
    loader: Box<dyn TreeLoader>,
    speech: Arc<dyn SpeechBackend>,
    window: Option<Window>,
    cache: DedupCache,
    session: Session,
    state: PassState,
    focused: Option<ControlId>,
}

impl Narrator {
    /// Create a driver with no window attached.
    pub fn new(loader: Box<dyn TreeLoader>, speech: Arc<dyn SpeechBackend>) -> Self {
        Self {
            loader,
            speech,
            window: None,
            cache: DedupCache::new(),
            session: Session::new(),
            state: PassState::Idle,
            focused: None,
        }
    }

    /// The currently attached window, if any.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// The driver's position in the pass state machine.
    pub fn state(&self) -> PassState {
        self.state
    }

    /// The current focus session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The control the driver believes is focused.
    pub fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    /// Replace the window wholesale: the old tree, its name map, and
    /// its dedup entries are discarded together.
    pub fn attach_window(&mut self, window: Window) {
        debug!(
            target: targets::ENGINE,
            window_id = window.window_id(),
            controls = window.control_count(),
            "window attached"
        );
        self.cache.clear();
        self.session.begin_focus();
        self.focused = Some(window.root());
        self.window = Some(window);
    }

    /// Narrate one event: resolve, dedup-filter, emit, commit.
    ///
    /// Returns the emitted batch (empty when everything deduplicated
    /// away). Errors are confined to the driver's edges, either no
    /// window attached or the loader failing, and leave the previous
    /// state untouched.
    pub fn handle_event(
        &mut self,
        host: &dyn HostShell,
        event: ChangeEvent,
    ) -> Result<Vec<Utterance>> {
        self.state = PassState::Resolving;
        let pass = match self.resolve(host, event) {
            Ok(pass) => pass,
            Err(err) => {
                self.state = PassState::Idle;
                return Err(err);
            }
        };

        self.state = PassState::Emitting;
        let batch = self.commit(pass);
        if !batch.is_empty() {
            self.speech.enqueue(batch.clone());
        }
        self.state = PassState::Idle;
        Ok(batch)
    }

    /// Drive the narrator from the change-event queue until it closes.
    ///
    /// A `WindowChanged` arriving while a pass is in flight abandons
    /// that pass before emission; its partial results are dropped.
    pub fn run(&mut self, host: &dyn HostShell, events: &Receiver<ChangeEvent>) -> Result<()> {
        loop {
            let event = events
                .recv()
                .map_err(|_| OratorError::EventQueueClosed)?;
            self.pump(host, events, event);
        }
    }

    fn pump(&mut self, host: &dyn HostShell, events: &Receiver<ChangeEvent>, first: ChangeEvent) {
        let mut event = first;
        loop {
            self.state = PassState::Resolving;
            let pass = match self.resolve(host, event) {
                Ok(pass) => pass,
                Err(err) => {
                    trace!(target: targets::ENGINE, error = %err, "event not narrated");
                    Pass::empty()
                }
            };

            match events.try_recv() {
                Ok(next) if next.preempts() => {
                    // The pass belongs to a window that is going away.
                    debug!(
                        target: targets::ENGINE,
                        reason = %OratorError::StaleWindow,
                        "in-flight pass abandoned"
                    );
                    event = next;
                    continue;
                }
                Ok(next) => {
                    self.emit(pass);
                    event = next;
                }
                Err(_) => {
                    self.emit(pass);
                    break;
                }
            }
        }
        self.state = PassState::Idle;
    }

    fn emit(&mut self, pass: Pass) {
        self.state = PassState::Emitting;
        let batch = self.commit(pass);
        if !batch.is_empty() {
            self.speech.enqueue(batch);
        }
        self.state = PassState::Idle;
    }

    fn resolve(&mut self, host: &dyn HostShell, event: ChangeEvent) -> Result<Pass> {
        match event {
            ChangeEvent::WindowChanged { window_id } => {
                let window = self.loader.build(window_id).inspect_err(|err| {
                    warn!(target: targets::ENGINE, window_id, error = %err, "window load failed");
                })?;
                self.attach_window(window);

                let Some(window) = self.window.as_ref() else {
                    return Ok(Pass::empty());
                };
                let root = window.root();
                Ok(Self::focus_pass(
                    window,
                    &self.cache,
                    &mut self.session,
                    host,
                    root,
                ))
            }
            ChangeEvent::FocusChanged { control_id } => {
                self.session.begin_focus();
                let Some(window) = self.window.as_ref() else {
                    return Err(OratorError::NoWindow);
                };
                let Some(id) = window.control_by_host_id(control_id) else {
                    trace!(
                        target: targets::ENGINE,
                        control_id,
                        "focus target not in window"
                    );
                    self.focused = None;
                    return Ok(Pass::empty());
                };
                self.focused = Some(id);
                Ok(Self::focus_pass(
                    window,
                    &self.cache,
                    &mut self.session,
                    host,
                    id,
                ))
            }
            ChangeEvent::Tick => {
                let Some(window) = self.window.as_ref() else {
                    return Err(OratorError::NoWindow);
                };
                Ok(Self::tick_pass(
                    window,
                    &self.cache,
                    &self.session,
                    host,
                    self.focused,
                ))
            }
        }
    }

    /// Resolve heading and value for a focus or window change.
    fn focus_pass(
        window: &Window,
        cache: &DedupCache,
        session: &mut Session,
        host: &dyn HostShell,
        id: ControlId,
    ) -> Pass {
        let Some(node) = window.node(id) else {
            return Pass::empty();
        };
        // An invisible target contributes nothing, even when the host
        // names it as the event target.
        if !node.is_visible(host) {
            return Pass::empty();
        }

        let mut pass = Pass {
            target: Some(id),
            ..Pass::default()
        };

        let mut heading = Statements::new();
        window.voice_heading(host, id, &mut heading);
        let heading_text = heading.rendered(StatementKind::Heading);
        if cache.heading_changed(id, &heading_text) {
            heading.mark_interrupt(StatementKind::Heading);
            pass.heading = Some(heading_text);
            pass.statements.extend(heading);
        }

        let mut value = Statements::new();
        window.voice_value(host, id, &mut value);
        let value_text = value.rendered(StatementKind::Value);
        if cache.value_changed(id, &value_text) {
            pass.value = Some(value_text);
            pass.statements.extend(value);
        }

        if node.capabilities().change_without_focus_change {
            session.enable_fast_poll();
        }
        pass
    }

    /// Resolve the working value for a tick. Headings are never
    /// re-voiced here; only the value slot is consulted.
    fn tick_pass(
        window: &Window,
        cache: &DedupCache,
        session: &Session,
        host: &dyn HostShell,
        focused: Option<ControlId>,
    ) -> Pass {
        if !session.fast_poll() {
            return Pass::empty();
        }
        let Some(id) = focused else {
            return Pass::empty();
        };
        let Some(node) = window.node(id) else {
            return Pass::empty();
        };
        if !node.capabilities().change_without_focus_change {
            return Pass::empty();
        }

        let mut value = Statements::new();
        window.voice_working_value(host, id, &mut value);
        let value_text = value.rendered(StatementKind::Value);
        if !cache.value_changed(id, &value_text) {
            return Pass::empty();
        }

        // The first value since the focus change interrupts; later
        // tick values queue behind whatever is already speaking.
        if session.first_value_pending() {
            value.mark_interrupt(StatementKind::Value);
        }
        Pass {
            target: Some(id),
            heading: None,
            value: Some(value_text),
            statements: value,
        }
    }

    /// Update the dedup cache and session from a surviving pass, and
    /// flatten it into the backend batch.
    fn commit(&mut self, pass: Pass) -> Vec<Utterance> {
        let Some(id) = pass.target else {
            return Vec::new();
        };
        if let Some(heading) = pass.heading {
            self.cache.record_heading(id, heading);
        }
        if let Some(value) = pass.value {
            if pass.statements.has_kind(StatementKind::Value) {
                self.session.mark_value_voiced();
            }
            self.cache.record_value(id, value);
        }
        pass.statements.into_utterances()
    }
}
