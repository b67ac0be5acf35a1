//! Control nodes: the immutable widget tree mirroring the host UI.
//!
//! Each node is a closed tagged variant over the widget kinds the host
//! shell's declarative UI description can produce. The variant is
//! decided once at build time; every dispatch afterwards is an
//! exhaustive match, never a string lookup.

use slotmap::new_key_type;

use orator_core::{
    HostShell, Phrase, PhraseList, WidgetValue, TOGGLE_OFF_GLYPH, TOGGLE_ON_GLYPH,
};

use crate::topic::Topic;

new_key_type! {
    /// A unique identifier for a control node in a window's arena.
    ///
    /// `ControlId`s are stable for the life of the window and become
    /// invalid when the window is discarded.
    pub struct ControlId;
}

/// Formatting descriptor for numeric widget values.
///
/// A slider narrated through `Units::new().with_suffix("%")` speaks
/// "42%" instead of a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Units {
    suffix: Option<String>,
    decimals: u8,
}

impl Units {
    /// Create a descriptor with no suffix and zero decimals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the given suffix to every rendered value.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Render values with the given number of decimal places.
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Render a numeric position as speakable text.
    pub fn format(&self, value: f64) -> String {
        let mut out = format!("{:.*}", self.decimals as usize, value);
        if let Some(suffix) = &self.suffix {
            out.push_str(suffix);
        }
        out
    }
}

/// One conditional layout of a collection control's items.
///
/// The host evaluates `condition`; the first holding layout (in
/// declaration order) wins, and the text of its label children is what
/// gets narrated for the focused item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemLayout {
    condition: Option<String>,
    labels: Vec<String>,
}

impl ItemLayout {
    /// Create an unconditional layout with no labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate this layout on an opaque host-evaluated condition.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Append a label child's text expression.
    pub fn with_label(mut self, expr: impl Into<String>) -> Self {
        self.labels.push(expr.into());
        self
    }

    /// Whether this layout applies right now.
    pub fn holds(&self, host: &dyn HostShell) -> bool {
        match &self.condition {
            None => true,
            Some(expr) => host.is_visible(expr),
        }
    }

    /// The label children's text expressions, in declaration order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// The conditional layouts of a collection control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionLayouts {
    /// Layouts for unfocused items.
    pub item_layouts: Vec<ItemLayout>,
    /// Layouts for the focused item; consulted first.
    pub focused_layouts: Vec<ItemLayout>,
}

/// The closed set of widget kinds the narration core understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// A top-level window or dialog.
    Window,
    /// A grouping container.
    Group,
    /// A push button.
    Button,
    /// A single-line text input; narrates its label2 contents.
    Edit,
    /// A static text label.
    Label,
    /// A toggle button with an on/off state.
    RadioButton,
    /// A value chosen from a range.
    Slider {
        /// How to render the numeric position, if at all.
        units: Option<Units>,
    },
    /// A scroll position indicator.
    Scrollbar,
    /// A spinner cycling through values.
    Spin,
    /// A vertical/horizontal item list.
    List(CollectionLayouts),
    /// A grid of items.
    Panel(CollectionLayouts),
}

/// The capability contract one control kind exposes.
///
/// All narration dispatch is driven by these flags; nothing downstream
/// cases on the kind itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The control announces a label.
    pub label: bool,
    /// The control also narrates its label2 text.
    pub label2: bool,
    /// The control has a narratable value.
    pub value: bool,
    /// The value is an on/off state spoken as a glyph.
    pub boolean_value: bool,
    /// The control holds a collection of items.
    pub item_collection: bool,
    /// The control contains other controls.
    pub container: bool,
    /// The value can change while focus stays put (narrated on tick).
    pub change_without_focus_change: bool,
}

impl ControlKind {
    /// The capability contract for this kind.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Window => Capabilities {
                label: true,
                container: true,
                ..Default::default()
            },
            Self::Group => Capabilities {
                label: true,
                container: true,
                ..Default::default()
            },
            Self::Button => Capabilities {
                label: true,
                ..Default::default()
            },
            Self::Edit => Capabilities {
                label: true,
                label2: true,
                value: true,
                ..Default::default()
            },
            Self::Label => Capabilities {
                label: true,
                ..Default::default()
            },
            Self::RadioButton => Capabilities {
                label: true,
                value: true,
                boolean_value: true,
                change_without_focus_change: true,
                ..Default::default()
            },
            Self::Slider { .. } => Capabilities {
                value: true,
                change_without_focus_change: true,
                ..Default::default()
            },
            Self::Scrollbar => Capabilities {
                value: true,
                ..Default::default()
            },
            Self::Spin => Capabilities {
                label: true,
                label2: true,
                value: true,
                ..Default::default()
            },
            Self::List(_) => Capabilities {
                value: true,
                item_collection: true,
                container: true,
                change_without_focus_change: true,
                ..Default::default()
            },
            Self::Panel(_) => Capabilities {
                value: true,
                item_collection: true,
                container: true,
                change_without_focus_change: true,
                ..Default::default()
            },
        }
    }

    /// The generic spoken name for this kind.
    pub fn generic_name(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Group => "group",
            Self::Button => "button",
            Self::Edit => "edit",
            Self::Label => "label",
            Self::RadioButton => "radio button",
            Self::Slider { .. } => "slider",
            Self::Scrollbar => "scroll bar",
            Self::Spin => "spinner",
            Self::List(_) => "list",
            Self::Panel(_) => "panel",
        }
    }

    /// The conditional layouts, for collection kinds.
    pub fn layouts(&self) -> Option<&CollectionLayouts> {
        match self {
            Self::List(layouts) | Self::Panel(layouts) => Some(layouts),
            _ => None,
        }
    }

    /// The units descriptor, for range kinds that carry one.
    pub fn units(&self) -> Option<&Units> {
        match self {
            Self::Slider { units } => units.as_ref(),
            _ => None,
        }
    }
}

/// A node in the immutable widget tree.
///
/// Created once per window build and destroyed with the window; the
/// only mutation it ever sees is the post-build reference-linking pass.
#[derive(Debug, Clone)]
pub struct ControlNode {
    pub(crate) control_id: i32,
    pub(crate) kind: ControlKind,
    pub(crate) visible_expr: Option<String>,
    pub(crate) parent: Option<ControlId>,
    pub(crate) children: Vec<ControlId>,
    pub(crate) topic: Topic,
}

impl ControlNode {
    /// The host's stable integer id, `-1` if anonymous.
    pub fn control_id(&self) -> i32 {
        self.control_id
    }

    /// The owning parent, `None` for the window root.
    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    /// The widget kind.
    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// The capability contract, shorthand for `kind().capabilities()`.
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// This node's children, in declaration order.
    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    /// This node's narration topic (the null topic if unannotated).
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Evaluate this node's visibility through the host.
    ///
    /// A node without a predicate is visible; a predicate the host
    /// cannot evaluate counts as hidden.
    pub fn is_visible(&self, host: &dyn HostShell) -> bool {
        match &self.visible_expr {
            None => true,
            Some(expr) => host.is_visible(expr),
        }
    }

    /// Fetch the native label through host introspection.
    pub fn native_label(&self, host: &dyn HostShell) -> Option<String> {
        if self.control_id < 0 {
            return None;
        }
        let label = host.widget_label(self.control_id);
        if label.is_empty() { None } else { Some(label) }
    }

    /// Fetch the label2 text, for kinds that narrate it.
    pub fn label2_text(&self, host: &dyn HostShell) -> Option<String> {
        if !self.capabilities().label2 {
            return None;
        }
        match host.widget_value(self.control_id) {
            WidgetValue::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Render this node's current value as phrases.
    ///
    /// Returns `None` when the kind has no value capability or the
    /// host reports nothing; callers voice nothing for the slot.
    pub fn value_phrases(&self, host: &dyn HostShell) -> Option<PhraseList> {
        let caps = self.capabilities();
        if !caps.value {
            return None;
        }
        let phrases = match host.widget_value(self.control_id) {
            WidgetValue::None => return None,
            WidgetValue::Text(text) => PhraseList::from(Phrase::new(text)),
            WidgetValue::Number(n) => {
                let text = match self.kind.units() {
                    Some(units) => units.format(n),
                    None => Units::new().format(n),
                };
                PhraseList::from(Phrase::new(text))
            }
            WidgetValue::Toggle(on) => {
                if !caps.boolean_value {
                    return None;
                }
                let glyph = if on { TOGGLE_ON_GLYPH } else { TOGGLE_OFF_GLYPH };
                PhraseList::from(Phrase::new(glyph))
            }
            WidgetValue::Items(items) => {
                if !caps.item_collection {
                    return None;
                }
                items.into_iter().map(Phrase::new).collect()
            }
            WidgetValue::Selected { index, count, text } => {
                if !caps.item_collection {
                    return None;
                }
                [Phrase::new(text), Phrase::new(format!("{} of {}", index + 1, count))]
                    .into_iter()
                    .collect()
            }
        };
        if phrases.is_empty() { None } else { Some(phrases) }
    }

    /// Render the focused item through the first holding layout.
    ///
    /// Consults focused layouts before item layouts, in declaration
    /// order; first holding layout wins. Returns `None` when no layout
    /// holds or the winning layout's labels all evaluate empty.
    pub fn layout_phrases(&self, host: &dyn HostShell) -> Option<PhraseList> {
        let layouts = self.kind.layouts()?;
        let winner = layouts
            .focused_layouts
            .iter()
            .chain(layouts.item_layouts.iter())
            .find(|layout| layout.holds(host))?;

        let phrases: PhraseList = winner
            .labels()
            .iter()
            .map(|expr| Phrase::new(host.eval_text(expr)))
            .collect();
        if phrases.is_empty() { None } else { Some(phrases) }
    }
}
