//! Narration topics and the label/value resolution engine.
//!
//! A [`Topic`] is the optional narration metadata a UI description can
//! attach to a control: an alternate type or label, cross-widget
//! references (`labeled_by`, `flows_to`, `read_next`), a hint, and a
//! label expression. Every control holds exactly one topic; the
//! default value is the null topic, which resolves nothing and lets
//! the control fall back to its native label.
//!
//! Reference graphs may be cyclic. Names are resolved once into direct
//! control handles by the post-build linking pass, so narration-time
//! resolution is O(1) per hop; a visited set bounded by the window's
//! control count guards the remaining runtime self-reference hazard.
//!
//! # Heading precedence
//!
//! One canonical order for every control kind, first success wins:
//!
//! 1. `alt_type`, if set and non-generic
//! 2. `alt_label`, through the host message catalog
//! 3. `labeled_by`, taking the referenced topic's raw label only
//! 4. `label_expr`, as a catalog id or host text expression
//! 5. the control's native label via host introspection
//!
//! Afterwards a `read_next` reference chains the referenced topic's
//! whole heading into the same pass.

use std::collections::HashSet;

use tracing::trace;

use orator_core::logging::targets;
use orator_core::{HostShell, Phrase, ResolutionMiss, Statements};

use crate::tree::{ControlId, ControlNode};
use crate::window::Window;

/// A name reference to another topic.
///
/// The name is kept for diagnostics and forward references during
/// build; after the linking pass, `target` holds the direct handle and
/// narration never searches by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRef {
    name: String,
    target: Option<ControlId>,
}

impl TopicRef {
    /// Create an unlinked reference to a topic name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    /// The referenced topic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The linked control, once the linking pass has run.
    pub fn target(&self) -> Option<ControlId> {
        self.target
    }

    pub(crate) fn link(&mut self, target: Option<ControlId>) {
        self.target = target;
    }
}

/// Narration metadata attached to one control node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topic {
    name: Option<String>,
    alt_type: Option<String>,
    alt_label: Option<u32>,
    labeled_by: Option<TopicRef>,
    flows_to: Option<TopicRef>,
    read_next: Option<TopicRef>,
    hint_text: Option<String>,
    label_expr: Option<String>,
}

impl Topic {
    /// Create the null topic: no metadata, all resolution falls back
    /// to the owning control's native behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name this topic so other topics can reference it.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the spoken control type.
    pub fn with_alt_type(mut self, alt_type: impl Into<String>) -> Self {
        self.alt_type = Some(alt_type.into());
        self
    }

    /// Set an alternate label as a message-catalog id.
    pub fn with_alt_label(mut self, message_id: u32) -> Self {
        self.alt_label = Some(message_id);
        self
    }

    /// Borrow another topic's label by name.
    pub fn with_labeled_by(mut self, name: impl Into<String>) -> Self {
        self.labeled_by = Some(TopicRef::new(name));
        self
    }

    /// Forward value narration to another topic by name.
    pub fn with_flows_to(mut self, name: impl Into<String>) -> Self {
        self.flows_to = Some(TopicRef::new(name));
        self
    }

    /// Chain another topic's heading after this one's, by name.
    pub fn with_read_next(mut self, name: impl Into<String>) -> Self {
        self.read_next = Some(TopicRef::new(name));
        self
    }

    /// Set the usage hint spoken after a fresh heading.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint_text = Some(hint.into());
        self
    }

    /// Set the label expression (catalog id or host text expression).
    pub fn with_label_expr(mut self, expr: impl Into<String>) -> Self {
        self.label_expr = Some(expr.into());
        self
    }

    /// This topic's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The spoken-type override, if any.
    pub fn alt_type(&self) -> Option<&str> {
        self.alt_type.as_deref()
    }

    /// The alternate label's message-catalog id, if any.
    pub fn alt_label(&self) -> Option<u32> {
        self.alt_label
    }

    /// The `labeled_by` reference, if any.
    pub fn labeled_by(&self) -> Option<&TopicRef> {
        self.labeled_by.as_ref()
    }

    /// The `flows_to` reference, if any.
    pub fn flows_to(&self) -> Option<&TopicRef> {
        self.flows_to.as_ref()
    }

    /// The `read_next` reference, if any.
    pub fn read_next(&self) -> Option<&TopicRef> {
        self.read_next.as_ref()
    }

    /// The usage hint, if any.
    pub fn hint_text(&self) -> Option<&str> {
        self.hint_text.as_deref()
    }

    /// The label expression, if any.
    pub fn label_expr(&self) -> Option<&str> {
        self.label_expr.as_deref()
    }

    /// Whether this is the null topic.
    pub fn is_null(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn assign_name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub(crate) fn link_refs(&mut self, mut resolve: impl FnMut(&str) -> Option<ControlId>) {
        for reference in [&mut self.labeled_by, &mut self.flows_to, &mut self.read_next]
            .into_iter()
            .flatten()
        {
            let target = resolve(reference.name());
            if target.is_none() {
                trace!(
                    target: targets::TREE,
                    name = reference.name(),
                    "reference did not resolve during linking"
                );
            }
            reference.link(target);
        }
    }
}

/// Visited-node guard bounding reference-chain traversal.
///
/// The bound is the window's control count, so even a fully connected
/// reference cycle terminates after voicing each topic at most once.
pub(crate) struct Visited {
    seen: HashSet<ControlId>,
    cap: usize,
}

impl Visited {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::new(),
            cap,
        }
    }

    /// Record a visit. Returns `false` if the node was already visited
    /// or the chain exceeded the bound; callers treat that as a miss
    /// and keep what was gathered so far.
    pub(crate) fn enter(&mut self, id: ControlId) -> bool {
        if self.seen.len() >= self.cap || !self.seen.insert(id) {
            trace!(target: targets::TOPIC, ?id, miss = %ResolutionMiss::CycleGuard, "chain stopped");
            return false;
        }
        true
    }
}

/// Follow a topic reference to its control, preferring the build-time
/// link and falling back to a name lookup for references created after
/// linking (test fixtures, mainly).
fn follow(win: &Window, reference: Option<&TopicRef>) -> Option<ControlId> {
    let reference = reference?;
    if let Some(target) = reference.target() {
        return Some(target);
    }
    let target = win.names().resolve(reference.name());
    if target.is_none() {
        trace!(
            target: targets::TOPIC,
            miss = %ResolutionMiss::UnknownReference(reference.name().to_string()),
            "unresolved reference at narration time"
        );
    }
    target
}

/// Resolve a label expression: a numeric expression is a
/// message-catalog id, anything else goes through host text evaluation.
fn eval_label_expr(host: &dyn HostShell, expr: &str) -> String {
    if let Ok(message_id) = expr.parse::<u32>() {
        let text = host.localize(message_id);
        if !text.is_empty() {
            return text;
        }
    }
    host.eval_text(expr)
}

/// The referenced topic's raw label: its label expression or native
/// label, never its alt fields or chains. `labeled_by` borrows this
/// and nothing more.
fn raw_label(host: &dyn HostShell, node: &ControlNode) -> Option<String> {
    if let Some(expr) = node.topic().label_expr() {
        let text = eval_label_expr(host, expr);
        if !text.is_empty() {
            return Some(text);
        }
    }
    node.native_label(host)
}

/// Walk the canonical heading precedence for one node.
fn heading_text(win: &Window, host: &dyn HostShell, node: &ControlNode) -> Option<String> {
    let topic = node.topic();

    // An alt type that is empty, the literal "control", or merely
    // restates the kind's own spoken name is generic and skipped.
    if let Some(alt_type) = topic.alt_type() {
        if !alt_type.is_empty()
            && !alt_type.eq_ignore_ascii_case("control")
            && !alt_type.eq_ignore_ascii_case(node.kind().generic_name())
        {
            return Some(alt_type.to_string());
        }
    }

    if let Some(message_id) = topic.alt_label() {
        let text = host.localize(message_id);
        if !text.is_empty() {
            return Some(text);
        }
    }

    if let Some(target) = follow(win, topic.labeled_by()) {
        if let Some(text) = win.node(target).and_then(|n| raw_label(host, n)) {
            return Some(text);
        }
    }

    if let Some(expr) = topic.label_expr() {
        let text = eval_label_expr(host, expr);
        if !text.is_empty() {
            return Some(text);
        }
    }

    if node.capabilities().label {
        if let Some(label) = node.native_label(host) {
            return Some(label);
        }
    }
    // Edits and spinners narrate their label2 when no label resolved.
    node.label2_text(host)
}

/// Voice one node's heading and its `read_next` chain.
pub(crate) fn voice_heading(
    win: &Window,
    host: &dyn HostShell,
    id: ControlId,
    out: &mut Statements,
    visited: &mut Visited,
) -> bool {
    let Some(node) = win.node(id) else {
        return false;
    };
    if !node.is_visible(host) {
        return false;
    }
    if !visited.enter(id) {
        return false;
    }

    let mut spoke = false;
    if let Some(text) = heading_text(win, host, node) {
        out.add_heading(Phrase::new(text));
        spoke = true;
        // A hint rides along with the heading it explains; if the
        // heading is later deduplicated away, so is the hint.
        if let Some(hint) = node.topic().hint_text() {
            out.add_hint(Phrase::new(hint));
        }
    }

    if let Some(next) = follow(win, node.topic().read_next()) {
        spoke |= voice_heading(win, host, next, out, visited);
    }
    spoke
}

/// Voice the full heading chain for a focus target: the node itself,
/// then every visible ancestor's `read_next` chain, nearest first.
///
/// Ancestors do not voice their own headings on a focus change; only
/// their chained topics speak.
pub(crate) fn voice_heading_chain(
    win: &Window,
    host: &dyn HostShell,
    id: ControlId,
    out: &mut Statements,
) -> bool {
    let mut visited = Visited::new(win.control_count());
    let mut spoke = voice_heading(win, host, id, out, &mut visited);

    for ancestor in win.ancestors(id) {
        let Some(node) = win.node(ancestor) else {
            continue;
        };
        if !node.is_visible(host) {
            continue;
        }
        if let Some(next) = follow(win, node.topic().read_next()) {
            spoke |= voice_heading(win, host, next, out, &mut visited);
        }
    }
    spoke
}

/// Voice one node's value, honoring `flows_to` delegation.
pub(crate) fn voice_value(
    win: &Window,
    host: &dyn HostShell,
    id: ControlId,
    out: &mut Statements,
    visited: &mut Visited,
) -> bool {
    let Some(node) = win.node(id) else {
        return false;
    };
    if !node.is_visible(host) {
        return false;
    }
    if !visited.enter(id) {
        return false;
    }

    // flows_to delegates entirely; the local value stays silent.
    if let Some(target) = follow(win, node.topic().flows_to()) {
        return voice_value(win, host, target, out, visited);
    }

    match node.value_phrases(host) {
        Some(phrases) => {
            out.add_value(phrases);
            true
        }
        None => false,
    }
}

/// Voice one node's working value: the tick-time counterpart of
/// [`voice_value`]. Idempotent and cheap; collection controls consult
/// their conditional layouts before falling back to plain values.
pub(crate) fn voice_working_value(
    win: &Window,
    host: &dyn HostShell,
    id: ControlId,
    out: &mut Statements,
    visited: &mut Visited,
) -> bool {
    let Some(node) = win.node(id) else {
        return false;
    };
    if !node.is_visible(host) {
        return false;
    }
    if !visited.enter(id) {
        return false;
    }

    if let Some(target) = follow(win, node.topic().flows_to()) {
        return voice_working_value(win, host, target, out, visited);
    }

    if node.capabilities().item_collection {
        if let Some(phrases) = node.layout_phrases(host) {
            out.add_value(phrases);
            return true;
        }
    }

    match node.value_phrases(host) {
        Some(phrases) => {
            out.add_value(phrases);
            true
        }
        None => false,
    }
}
