//! Orator - a screen-reader narration engine for media-center UI shells.
//!
//! Orator converts a shell's declarative UI description (a tree of
//! widgets, optionally annotated with narration metadata) plus a live
//! stream of focus/window/tick events into an ordered sequence of
//! speakable utterances, so a non-sighted user can operate the UI by
//! ear.
//!
//! # Architecture
//!
//! - [`tree`]: the immutable control-node tree and the build/linking
//!   pass compiling loader descriptors into it
//! - [`topic`]: per-widget narration metadata and the label/value
//!   resolution engine (reference chains, cycle guards)
//! - [`window`]: one window's tree plus its name-to-control resolver
//! - [`engine`]: the event-driven driver, dedup cache, and speech
//!   handoff
//!
//! The loader that compiles UI-description files, the host shell's
//! event source, and the speech backend are external collaborators;
//! Orator talks to them through the traits in [`orator_core`].
//!
//! # Example
//!
//! ```
//! use orator::prelude::*;
//!
//! // Describe a window the way the UI loader would.
//! let descriptor = WindowDescriptor::new(10).with_root(
//!     ControlDescriptor::new(ControlKind::Window).with_child(
//!         ControlDescriptor::new(ControlKind::Button)
//!             .with_control_id(1)
//!             .with_topic(Topic::new().with_alt_label(190)),
//!     ),
//! );
//! let window = Window::build(descriptor).unwrap();
//!
//! // Script the host and resolve the button's heading.
//! let host = StubHost::new();
//! host.set_message(190, "Save");
//!
//! let button = window.control_by_host_id(1).unwrap();
//! let mut statements = Statements::new();
//! window.voice_heading(&host, button, &mut statements);
//! assert_eq!(statements.rendered(StatementKind::Heading), "Save");
//! ```

pub use orator_core::*;

pub mod engine;
pub mod prelude;
pub mod topic;
pub mod tree;
pub mod window;
