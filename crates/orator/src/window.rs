//! Windows: one immutable control tree plus its reference resolver.
//!
//! A [`Window`] is built wholesale from the UI loader's descriptor and
//! discarded wholesale when the shell changes windows; nothing in it
//! mutates after the build-time linking pass. The embedded
//! [`WindowStruct`] maps topic names to control handles for the life
//! of the window.

use std::collections::HashMap;

use slotmap::SlotMap;

use orator_core::{HostShell, Phrase, Statements};

use crate::topic::{self, Visited};
use crate::tree::build::{BuildError, WindowDescriptor};
use crate::tree::{ControlId, ControlNode};

/// Per-window map from topic name to control handle.
///
/// Built with the tree, read-only afterward. Narration resolves every
/// cross-widget reference through this struct during linking and never
/// searches by name again.
#[derive(Debug, Clone, Default)]
pub struct WindowStruct {
    names: HashMap<String, ControlId>,
}

impl WindowStruct {
    /// Resolve a topic name to its control handle.
    pub fn resolve(&self, name: &str) -> Option<ControlId> {
        self.names.get(name).copied()
    }

    /// Whether a topic name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Register a name. Returns `false` on a duplicate, leaving the
    /// existing entry untouched.
    pub(crate) fn register(&mut self, name: String, id: ControlId) -> bool {
        if self.names.contains_key(&name) {
            return false;
        }
        self.names.insert(name, id);
        true
    }
}

/// One window's immutable control tree, name map, and host-id index.
#[derive(Debug, Clone)]
pub struct Window {
    pub(crate) window_id: i32,
    pub(crate) arena: SlotMap<ControlId, ControlNode>,
    pub(crate) root: ControlId,
    pub(crate) names: WindowStruct,
    pub(crate) by_control_id: HashMap<i32, ControlId>,
}

impl Window {
    /// Compile a loader descriptor into a window: arena, name map,
    /// host-id index, and the reference-linking pass.
    pub fn build(descriptor: WindowDescriptor) -> Result<Self, BuildError> {
        crate::tree::build::build_window(descriptor)
    }

    /// The host's id for this window.
    pub fn window_id(&self) -> i32 {
        self.window_id
    }

    /// The root control (the window node itself).
    pub fn root(&self) -> ControlId {
        self.root
    }

    /// Look up a node by handle.
    pub fn node(&self, id: ControlId) -> Option<&ControlNode> {
        self.arena.get(id)
    }

    /// Look up a node by the host's stable integer control id.
    pub fn control_by_host_id(&self, control_id: i32) -> Option<ControlId> {
        self.by_control_id.get(&control_id).copied()
    }

    /// The per-window name map.
    pub fn names(&self) -> &WindowStruct {
        &self.names
    }

    /// Total number of controls; also the visited-set bound.
    pub fn control_count(&self) -> usize {
        self.arena.len()
    }

    /// Iterate a node's ancestors, nearest first.
    pub fn ancestors(&self, id: ControlId) -> Ancestors<'_> {
        Ancestors {
            window: self,
            current: self.node(id).and_then(ControlNode::parent),
        }
    }

    /// Voice the heading chain for a focus target: the node's own
    /// heading (and `read_next` chain), then every visible ancestor's
    /// `read_next` chain, nearest first.
    pub fn voice_heading(&self, host: &dyn HostShell, id: ControlId, out: &mut Statements) -> bool {
        topic::voice_heading_chain(self, host, id, out)
    }

    /// Voice a node's value, honoring `flows_to` delegation.
    pub fn voice_value(&self, host: &dyn HostShell, id: ControlId, out: &mut Statements) -> bool {
        let mut visited = Visited::new(self.control_count());
        topic::voice_value(self, host, id, out, &mut visited)
    }

    /// Voice a node's working value: the tick-time counterpart of
    /// [`voice_value`](Self::voice_value), cheap and idempotent.
    pub fn voice_working_value(
        &self,
        host: &dyn HostShell,
        id: ControlId,
        out: &mut Statements,
    ) -> bool {
        let mut visited = Visited::new(self.control_count());
        topic::voice_working_value(self, host, id, out, &mut visited)
    }

    /// Voice a node's label2 text as a value statement, for kinds that
    /// narrate it. Returns `false` for everything else.
    pub fn voice_label2_value(
        &self,
        host: &dyn HostShell,
        id: ControlId,
        out: &mut Statements,
    ) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.is_visible(host) {
            return false;
        }
        match node.label2_text(host) {
            Some(text) => {
                out.add_value(Phrase::new(text));
                true
            }
            None => false,
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    window: &'a Window,
    current: Option<ControlId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ControlId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.window.node(id).and_then(ControlNode::parent);
        Some(id)
    }
}
