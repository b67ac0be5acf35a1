//! Building windows from loader descriptors.
//!
//! The UI loader compiles the shell's declarative window description
//! into a [`WindowDescriptor`]; this module turns that into the
//! immutable arena-backed [`Window`]. Building has three steps:
//!
//! 1. walk the descriptor, inserting nodes and parent links, and
//!    register topic names and host control ids
//! 2. assign generated names to anonymous annotated nodes, probing the
//!    finished name map so a user-chosen name is never shadowed
//! 3. link every `labeled_by`/`flows_to`/`read_next` name once into a
//!    direct control handle
//!
//! Unresolvable reference names are left unlinked and surface as
//! narration-time misses, not build errors; the UI descriptions in the
//! wild reference controls that only exist in other layouts.

use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::{debug, warn};

use orator_core::logging::targets;

use crate::topic::Topic;
use crate::tree::{ControlId, ControlKind, ControlNode};
use crate::window::{Window, WindowStruct};

/// Errors that can occur while compiling a window descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two topics in the same window claimed the same name.
    #[error("duplicate topic name '{name}' in window {window_id}")]
    DuplicateTopicName {
        /// The contested topic name.
        name: String,
        /// The window being built.
        window_id: i32,
    },
}

/// The loader's description of one control, before compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDescriptor {
    control_id: i32,
    kind: ControlKind,
    visible_expr: Option<String>,
    topic: Topic,
    children: Vec<ControlDescriptor>,
}

impl ControlDescriptor {
    /// Describe an anonymous control of the given kind.
    pub fn new(kind: ControlKind) -> Self {
        Self {
            control_id: -1,
            kind,
            visible_expr: None,
            topic: Topic::new(),
            children: Vec::new(),
        }
    }

    /// Set the host's stable integer control id.
    pub fn with_control_id(mut self, control_id: i32) -> Self {
        self.control_id = control_id;
        self
    }

    /// Attach an opaque host-evaluated visibility predicate.
    pub fn with_visible_expr(mut self, expr: impl Into<String>) -> Self {
        self.visible_expr = Some(expr.into());
        self
    }

    /// Attach narration metadata.
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }

    /// Append a child control.
    pub fn with_child(mut self, child: ControlDescriptor) -> Self {
        self.children.push(child);
        self
    }
}

/// The loader's description of one window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor {
    window_id: i32,
    root: ControlDescriptor,
}

impl WindowDescriptor {
    /// Describe a window with a bare `Window` root.
    pub fn new(window_id: i32) -> Self {
        Self {
            window_id,
            root: ControlDescriptor::new(ControlKind::Window),
        }
    }

    /// Replace the root control description.
    pub fn with_root(mut self, root: ControlDescriptor) -> Self {
        self.root = root;
        self
    }

    /// The host's id for this window.
    pub fn window_id(&self) -> i32 {
        self.window_id
    }
}

pub(crate) fn build_window(descriptor: WindowDescriptor) -> Result<Window, BuildError> {
    let window_id = descriptor.window_id;
    let mut builder = Builder {
        window_id,
        arena: SlotMap::with_key(),
        names: WindowStruct::default(),
        by_control_id: HashMap::new(),
    };

    let root = builder.insert(descriptor.root, None)?;
    builder.assign_generated_names();
    let mut window = Window {
        window_id,
        arena: builder.arena,
        root,
        names: builder.names,
        by_control_id: builder.by_control_id,
    };
    link_references(&mut window);

    debug!(
        target: targets::TREE,
        window_id,
        controls = window.control_count(),
        names = window.names().len(),
        "window built"
    );
    Ok(window)
}

struct Builder {
    window_id: i32,
    arena: SlotMap<ControlId, ControlNode>,
    names: WindowStruct,
    by_control_id: HashMap<i32, ControlId>,
}

impl Builder {
    fn insert(
        &mut self,
        descriptor: ControlDescriptor,
        parent: Option<ControlId>,
    ) -> Result<ControlId, BuildError> {
        let id = self.arena.insert(ControlNode {
            control_id: descriptor.control_id,
            kind: descriptor.kind,
            visible_expr: descriptor.visible_expr,
            parent,
            children: Vec::new(),
            topic: descriptor.topic,
        });

        if let Some(name) = self.arena[id].topic.name() {
            let name = name.to_string();
            if !self.names.register(name.clone(), id) {
                return Err(BuildError::DuplicateTopicName {
                    name,
                    window_id: self.window_id,
                });
            }
        }

        let control_id = self.arena[id].control_id;
        if control_id >= 0 {
            if let Some(previous) = self.by_control_id.insert(control_id, id) {
                // First declaration wins, matching host lookup order.
                warn!(
                    target: targets::TREE,
                    control_id,
                    "duplicate host control id; keeping the first declaration"
                );
                self.by_control_id.insert(control_id, previous);
            }
        }

        let mut children = Vec::with_capacity(descriptor.children.len());
        for child in descriptor.children {
            children.push(self.insert(child, Some(id))?);
        }
        self.arena[id].children = children;
        Ok(id)
    }

    /// Name every anonymous annotated node so reference linking and
    /// the name map treat all topics uniformly.
    ///
    /// Runs after every user-chosen name is registered and probes the
    /// map for each candidate, so a generated name can never collide
    /// with one a descriptor declared.
    fn assign_generated_names(&mut self) {
        let anonymous: Vec<ControlId> = self
            .arena
            .iter()
            .filter(|(_, node)| !node.topic.is_null() && node.topic.name().is_none())
            .map(|(id, _)| id)
            .collect();

        let mut n = 0u32;
        for id in anonymous {
            let name = loop {
                n += 1;
                let candidate = format!("topic-{n}");
                if !self.names.contains(&candidate) {
                    break candidate;
                }
            };
            self.arena[id].topic.assign_name(name.clone());
            self.names.register(name, id);
        }
    }
}

/// Resolve every reference name once into a direct control handle.
fn link_references(window: &mut Window) {
    let names = window.names.clone();
    for (_, node) in window.arena.iter_mut() {
        node.topic.link_refs(|name| names.resolve(name));
    }
}
