//! Dedup cache: per-topic memory of last-voiced heading and value.
//!
//! Entries compare by rendered text, not statement identity, so two
//! differently-assembled phrase lists that read the same suppress each
//! other. Only the driver mutates the cache, and only after a pass
//! survives to emission; an abandoned pass leaves no trace.

use slotmap::SecondaryMap;

use crate::tree::ControlId;

#[derive(Debug, Clone, Default)]
struct DedupEntry {
    last_heading: String,
    last_value: String,
}

/// Last-voiced text per control, keyed by the window's arena handles.
///
/// Cleared wholesale when the window is replaced; stale handles from a
/// discarded tree can never alias entries for the new one.
#[derive(Debug, Default)]
pub struct DedupCache {
    entries: SecondaryMap<ControlId, DedupEntry>,
}

impl DedupCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the rendered heading differs from the last-voiced one.
    pub fn heading_changed(&self, id: ControlId, rendered: &str) -> bool {
        self.entries
            .get(id)
            .is_none_or(|entry| entry.last_heading != rendered)
    }

    /// Whether the rendered value differs from the last-voiced one.
    pub fn value_changed(&self, id: ControlId, rendered: &str) -> bool {
        self.entries
            .get(id)
            .is_none_or(|entry| entry.last_value != rendered)
    }

    /// Record a voiced heading.
    pub fn record_heading(&mut self, id: ControlId, rendered: String) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.last_heading = rendered;
        } else {
            self.entries.insert(
                id,
                DedupEntry {
                    last_heading: rendered,
                    ..Default::default()
                },
            );
        }
    }

    /// Record a voiced value.
    pub fn record_value(&mut self, id: ControlId, rendered: String) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.last_value = rendered;
        } else {
            self.entries.insert(
                id,
                DedupEntry {
                    last_value: rendered,
                    ..Default::default()
                },
            );
        }
    }

    /// Forget everything; called when the window is replaced.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of controls with recorded speech.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
