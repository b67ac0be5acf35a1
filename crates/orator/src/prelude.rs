//! Prelude module for Orator.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use orator::prelude::*;
//! ```
//!
//! This provides access to:
//! - The narration driver (`Narrator`, `TreeLoader`)
//! - The control tree (`ControlKind`, `ControlNode`, descriptors)
//! - Topics and references (`Topic`, `TopicRef`)
//! - The statement model (`Statements`, `Phrase`, `Utterance`)
//! - Host and speech interfaces (`HostShell`, `SpeechBackend`)

// ============================================================================
// Narration Driver
// ============================================================================

pub use crate::engine::{DedupCache, Narrator, PassState, TreeLoader};

// ============================================================================
// Control Tree
// ============================================================================

pub use crate::tree::{
    BuildError, Capabilities, CollectionLayouts, ControlDescriptor, ControlId, ControlKind,
    ControlNode, ItemLayout, Units, WindowDescriptor,
};
pub use crate::window::{Window, WindowStruct};

// ============================================================================
// Topics
// ============================================================================

pub use crate::topic::{Topic, TopicRef};

// ============================================================================
// Events, Statements, Host, and Speech
// ============================================================================

pub use orator_core::{
    change_event_channel, ChangeEvent, ChannelSpeech, HostShell, NullHost, OratorError, Phrase,
    PhraseList, Result, Session, SpeechBackend, Statement, StatementKind, Statements, StubHost,
    Utterance, WidgetValue,
};
