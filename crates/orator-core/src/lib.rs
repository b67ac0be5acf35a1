//! Core systems for Orator.
//!
//! This crate provides the foundational components of the Orator
//! narration engine, independent of any widget tree:
//!
//! - **Change events**: the three-event vocabulary from the host shell
//!   and the bounded queue the driver consumes it from
//! - **Host interface**: the [`HostShell`] trait wrapping visibility
//!   predicates, text expressions, widget introspection, and the
//!   message catalog
//! - **Statement model**: phrases, typed statements, and the flattened
//!   utterance records handed to the speech backend
//! - **Sessions**: per-focus-session state threaded through the driver
//! - **Speech handoff**: the [`SpeechBackend`] trait and channel/test
//!   implementations
//!
//! # Example
//!
//! ```
//! use orator_core::{Phrase, StatementKind, Statements};
//!
//! let mut stmts = Statements::new();
//! stmts.add_value(Phrase::new("42%"));
//! stmts.add_heading(Phrase::new("Volume"));
//!
//! // Emission order is heading, then value, then hint.
//! let utterances = stmts.into_utterances();
//! assert_eq!(utterances[0].kind, StatementKind::Heading);
//! assert_eq!(utterances[1].text, "42%");
//! ```

pub mod error;
pub mod event;
pub mod host;
pub mod logging;
pub mod session;
pub mod speech;
pub mod statement;

pub use error::{OratorError, ResolutionMiss, Result};
pub use event::{change_event_channel, ChangeEvent};
pub use host::{HostShell, NullHost, StubHost, WidgetValue};
pub use session::Session;
pub use speech::{ChannelSpeech, CollectingSpeech, SpeechBackend};
pub use statement::{
    clean_text, Phrase, PhraseList, Statement, StatementKind, Statements, Utterance,
    TOGGLE_OFF_GLYPH, TOGGLE_ON_GLYPH,
};
