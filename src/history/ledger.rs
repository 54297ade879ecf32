//! Append-only history ledger

use crate::error::{Error, Result};
use crate::history::HistoryEntry;
use std::path::PathBuf;

/// Number of entries shown in the truncated history view
pub const RECENT_VIEW_LIMIT: usize = 5;

/// Insertion-ordered log of generation events
///
/// Append-only, with one exception: [`resolve_pending`] sets the saved path
/// on the most recently appended entry. That keeps the invariant that at
/// most the last entry is pending — once a newer entry is appended, an
/// older unresolved entry stays unresolved forever.
///
/// [`resolve_pending`]: HistoryLedger::resolve_pending
#[derive(Debug, Default)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new pending entry for `text`, stamped with the current time.
    pub fn record_generation(&mut self, text: impl Into<String>) -> &HistoryEntry {
        let index = self.entries.len();
        self.entries.push(HistoryEntry::new(text.into()));
        let entry = &self.entries[index];
        tracing::debug!(text = entry.text(), timestamp = %entry.timestamp(), "Recorded generation");
        entry
    }

    /// The latest entry, if it has not been downloaded yet.
    pub fn pending(&self) -> Option<&HistoryEntry> {
        self.entries.last().filter(|entry| entry.is_pending())
    }

    /// Mark the latest entry as saved to `path`.
    ///
    /// Fails with [`Error::NoPendingEntry`] when the ledger is empty or the
    /// latest entry was already resolved. Callers perform the file write
    /// first, so a failed write never mutates the ledger.
    pub fn resolve_pending(&mut self, path: PathBuf) -> Result<()> {
        match self.entries.last_mut() {
            Some(entry) if entry.is_pending() => {
                entry.resolve(path);
                Ok(())
            }
            _ => Err(Error::NoPendingEntry),
        }
    }

    /// All entries in append order
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The tail of the ledger shown in the history view: up to
    /// [`RECENT_VIEW_LIMIT`] entries, in append order.
    pub fn recent(&self) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(RECENT_VIEW_LIMIT);
        &self.entries[start..]
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any entry has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
