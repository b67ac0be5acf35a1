//! The immutable control-node tree.
//!
//! This module provides the widget-tree half of the narration core:
//!
//! - [`ControlNode`] and the closed [`ControlKind`] variant set
//! - [`Capabilities`], the per-kind narration contract
//! - [`Units`] and [`ItemLayout`]/[`CollectionLayouts`] descriptors
//! - descriptor types and the build/linking pass in [`build`]
//!
//! Trees are created once per window from the UI loader's output and
//! never mutate afterward; the whole tree is discarded and rebuilt
//! when the shell changes windows.

pub mod build;
mod control;

pub use build::{BuildError, ControlDescriptor, WindowDescriptor};
pub use control::{
    Capabilities, CollectionLayouts, ControlId, ControlKind, ControlNode, ItemLayout, Units,
};
