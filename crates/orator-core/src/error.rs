//! Error types for Orator.

use std::fmt;

/// The main error type for Orator operations.
///
/// Nothing in the narration core raises to the host shell: a failed
/// utterance degrades to silence rather than a crash. These errors are
/// confined to the driver's own edges (window loading, channel plumbing)
/// and to test code that wants to assert on outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OratorError {
    /// No window is attached; the event has nothing to narrate against.
    NoWindow,
    /// The event targeted a window that has already been discarded.
    StaleWindow,
    /// The tree loader failed to produce a window.
    Loader(String),
    /// The change-event queue has been disconnected.
    EventQueueClosed,
}

impl fmt::Display for OratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "No window is attached to the narrator"),
            Self::StaleWindow => write!(f, "Event targeted a discarded window"),
            Self::Loader(msg) => write!(f, "Failed to load window: {msg}"),
            Self::EventQueueClosed => write!(f, "The change-event queue has been disconnected"),
        }
    }
}

impl std::error::Error for OratorError {}

/// Why a narration slot produced no text.
///
/// Every variant is non-fatal: callers fall through to the next search
/// step, ultimately voicing nothing for the affected slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMiss {
    /// A name reference did not resolve to any control in the window.
    UnknownReference(String),
    /// Host expression evaluation produced no text.
    EmptyEvaluation,
    /// The control kind does not expose the requested slot.
    CapabilityAbsent,
    /// A reference chain exceeded the visited-node bound.
    CycleGuard,
}

impl fmt::Display for ResolutionMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownReference(name) => write!(f, "Unknown reference '{name}'"),
            Self::EmptyEvaluation => write!(f, "Expression evaluated to no text"),
            Self::CapabilityAbsent => write!(f, "Control does not support the requested slot"),
            Self::CycleGuard => write!(f, "Reference chain exceeded the visited-node bound"),
        }
    }
}

impl std::error::Error for ResolutionMiss {}

/// A specialized Result type for Orator operations.
pub type Result<T> = std::result::Result<T, OratorError>;
