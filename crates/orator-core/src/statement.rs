//! Statement and phrase model: the output vocabulary of the narration core.
//!
//! A narration pass produces an ordered batch of [`Statement`]s, each a
//! [`PhraseList`] tagged as heading, value, or hint. The batch is pure
//! data; it is handed atomically to the speech backend as flattened
//! [`Utterance`] records and consumed exactly once.

use std::fmt;

/// Spoken stand-in for an enabled toggle ("(*)").
pub const TOGGLE_ON_GLYPH: &str = "(*)";

/// Spoken stand-in for a disabled toggle ("( )").
pub const TOGGLE_OFF_GLYPH: &str = "( )";

/// Basic cleanup applied to every phrase: trims the ends and collapses
/// runs of whitespace. Anything further (symbol expansion, casing) is
/// the speech backend's business.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

/// One speakable fragment with its surrounding pauses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Phrase {
    text: String,
    pre_pause_ms: u32,
    post_pause_ms: u32,
}

impl Phrase {
    /// Create a phrase from raw text, applying basic cleanup.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: clean_text(&text.into()),
            pre_pause_ms: 0,
            post_pause_ms: 0,
        }
    }

    /// Set the pause preceding this phrase.
    pub fn with_pre_pause(mut self, ms: u32) -> Self {
        self.pre_pause_ms = ms;
        self
    }

    /// Set the pause following this phrase.
    pub fn with_post_pause(mut self, ms: u32) -> Self {
        self.post_pause_ms = ms;
        self
    }

    /// The cleaned phrase text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether cleanup left no speakable text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The pause preceding this phrase, in milliseconds.
    pub fn pre_pause_ms(&self) -> u32 {
        self.pre_pause_ms
    }

    /// The pause following this phrase, in milliseconds.
    pub fn post_pause_ms(&self) -> u32 {
        self.post_pause_ms
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// An ordered list of phrases spoken as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhraseList {
    phrases: Vec<Phrase>,
}

impl PhraseList {
    /// Create an empty phrase list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a phrase, dropping it if cleanup left it empty.
    pub fn push(&mut self, phrase: Phrase) {
        if !phrase.is_empty() {
            self.phrases.push(phrase);
        }
    }

    /// Whether the list holds no speakable phrases.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// The phrases in speaking order.
    pub fn iter(&self) -> std::slice::Iter<'_, Phrase> {
        self.phrases.iter()
    }

    /// Render the list to one comparison string.
    ///
    /// The dedup cache compares rendered text, not phrase identity, so
    /// two differently-assembled lists that read the same are "equal".
    pub fn rendered(&self) -> String {
        let mut out = String::new();
        for phrase in &self.phrases {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(phrase.text());
        }
        out
    }
}

impl From<Phrase> for PhraseList {
    fn from(phrase: Phrase) -> Self {
        let mut list = Self::new();
        list.push(phrase);
        list
    }
}

impl FromIterator<Phrase> for PhraseList {
    fn from_iter<I: IntoIterator<Item = Phrase>>(iter: I) -> Self {
        let mut list = Self::new();
        for phrase in iter {
            list.push(phrase);
        }
        list
    }
}

/// What a statement announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum StatementKind {
    /// What the focused thing *is* (label, type, chained labels).
    Heading = 0,
    /// What the focused thing currently *holds*.
    Value = 1,
    /// How to operate it; always trails the batch.
    Hint = 2,
}

/// One typed, orderable unit of speech output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    phrases: PhraseList,
    interrupt: bool,
}

impl Statement {
    /// Create a statement of the given kind.
    pub fn new(kind: StatementKind, phrases: PhraseList) -> Self {
        Self {
            kind,
            phrases,
            interrupt: false,
        }
    }

    /// The statement's kind tag.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The statement's phrases.
    pub fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    /// Whether this statement cuts off in-flight speech.
    ///
    /// Set through [`Statements::mark_interrupt`]; statements are born
    /// non-interrupting.
    pub fn interrupts(&self) -> bool {
        self.interrupt
    }
}

/// Append-only collector for one narration pass.
///
/// Resolution appends in discovery order; [`Statements::into_utterances`]
/// restores the emission contract (heading, then value, then hint) with
/// a stable sort, so chained headings keep their chain order.
#[derive(Debug, Clone, Default)]
pub struct Statements {
    items: Vec<Statement>,
}

impl Statements {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement, dropping it if it has no speakable phrases.
    pub fn push(&mut self, statement: Statement) {
        if !statement.phrases.is_empty() {
            self.items.push(statement);
        }
    }

    /// Append a heading statement.
    pub fn add_heading(&mut self, phrases: impl Into<PhraseList>) {
        self.push(Statement::new(StatementKind::Heading, phrases.into()));
    }

    /// Append a value statement.
    pub fn add_value(&mut self, phrases: impl Into<PhraseList>) {
        self.push(Statement::new(StatementKind::Value, phrases.into()));
    }

    /// Append a hint statement.
    pub fn add_hint(&mut self, phrases: impl Into<PhraseList>) {
        self.push(Statement::new(StatementKind::Hint, phrases.into()));
    }

    /// Whether the pass produced nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of collected statements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The collected statements in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.items.iter()
    }

    /// Whether any statement of the given kind was collected.
    pub fn has_kind(&self, kind: StatementKind) -> bool {
        self.items.iter().any(|s| s.kind == kind)
    }

    /// Render all statements of one kind to a single comparison string.
    pub fn rendered(&self, kind: StatementKind) -> String {
        let mut out = String::new();
        for statement in self.items.iter().filter(|s| s.kind == kind) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&statement.phrases.rendered());
        }
        out
    }

    /// Mark every statement of one kind as interrupting.
    pub fn mark_interrupt(&mut self, kind: StatementKind) {
        for statement in self.items.iter_mut().filter(|s| s.kind == kind) {
            statement.interrupt = true;
        }
    }

    /// Absorb another collector's statements, preserving order.
    pub fn extend(&mut self, other: Statements) {
        self.items.extend(other.items);
    }

    /// Flatten into backend records, sorted heading / value / hint.
    ///
    /// The sort is stable: statements of the same kind keep the order
    /// the resolution chain appended them in.
    pub fn into_utterances(self) -> Vec<Utterance> {
        let mut items = self.items;
        items.sort_by_key(|s| s.kind);

        let mut out = Vec::new();
        for statement in items {
            for phrase in statement.phrases.iter() {
                out.push(Utterance {
                    text: phrase.text().to_string(),
                    kind: statement.kind,
                    interrupt: statement.interrupt && out.is_empty(),
                    pre_pause_ms: phrase.pre_pause_ms(),
                    post_pause_ms: phrase.post_pause_ms(),
                });
            }
        }
        out
    }
}

/// One flattened record handed to the speech backend.
///
/// The backend owns voice selection, caching, and playback; this is
/// the whole contract between the narration core and speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// The cleaned text to speak.
    pub text: String,
    /// The statement kind this record came from.
    pub kind: StatementKind,
    /// Whether playback should cut off in-flight speech first.
    pub interrupt: bool,
    /// Pause before speaking, in milliseconds.
    pub pre_pause_ms: u32,
    /// Pause after speaking, in milliseconds.
    pub post_pause_ms: u32,
}
