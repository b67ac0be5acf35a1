//! Logging facilities for Orator.
//!
//! Orator uses the `tracing` crate for instrumentation. Install a
//! subscriber in the add-on entry point to see logs:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Narration passes log at debug level; individual resolution misses
//! at trace level, since they are the normal fallthrough mechanism and
//! fire constantly on busy windows.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core types target.
    pub const CORE: &str = "orator_core";
    /// Change-event queue target.
    pub const EVENT: &str = "orator_core::event";
    /// Narration driver target.
    pub const ENGINE: &str = "orator::engine";
    /// Label/value resolution target.
    pub const TOPIC: &str = "orator::topic";
    /// Tree building and linking target.
    pub const TREE: &str = "orator::tree";
    /// Speech handoff target.
    pub const SPEECH: &str = "orator_core::speech";
}
