//! Session history
//!
//! An in-memory, append-only log of generation and download events. The
//! history lives for the process lifetime and is never persisted between
//! sessions; a full CSV export is available on demand.

mod export;
mod ledger;

pub use export::write_csv;
pub use ledger::{HistoryLedger, RECENT_VIEW_LIMIT};

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Timestamp format used for filenames and export rows (second resolution,
/// filesystem-safe)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Marker written to the export for entries that were never downloaded
pub const NOT_DOWNLOADED: &str = "Not downloaded";

/// One generation event
///
/// Created only by [`HistoryLedger::record_generation`]; the single allowed
/// mutation is the ledger resolving `saved_path` once a download succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    text: String,
    created_at: DateTime<Local>,
    saved_path: Option<PathBuf>,
}

impl HistoryEntry {
    pub(crate) fn new(text: String) -> Self {
        Self::with_created_at(text, Local::now())
    }

    pub(crate) fn with_created_at(text: String, created_at: DateTime<Local>) -> Self {
        Self {
            text,
            created_at,
            saved_path: None,
        }
    }

    pub(crate) fn resolve(&mut self, path: PathBuf) {
        debug_assert!(self.saved_path.is_none());
        self.saved_path = Some(path);
    }

    /// The raw text that was encoded
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the entry was generated
    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Generation time formatted at second resolution
    pub fn timestamp(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Where the entry was saved, if it was ever downloaded
    pub fn saved_path(&self) -> Option<&Path> {
        self.saved_path.as_deref()
    }

    /// Whether the entry still awaits a download
    pub fn is_pending(&self) -> bool {
        self.saved_path.is_none()
    }

    /// Filename the download of this entry resolves to
    pub fn output_file_name(&self) -> String {
        format!("qrcode_{}.png", self.timestamp())
    }

    /// Short display form: text truncated to 20 characters plus the timestamp
    pub fn summary(&self) -> String {
        let display_text: String = if self.text.chars().count() > 20 {
            let truncated: String = self.text.chars().take(20).collect();
            format!("{truncated}...")
        } else {
            self.text.clone()
        };
        format!("{display_text} ({})", self.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_entry(text: &str) -> HistoryEntry {
        let created_at = Local.with_ymd_and_hms(2026, 8, 30, 14, 5, 9).unwrap();
        HistoryEntry::with_created_at(text.to_string(), created_at)
    }

    #[test]
    fn test_output_file_name() {
        let entry = fixed_entry("hello");
        assert_eq!(entry.output_file_name(), "qrcode_2026-08-30_14-05-09.png");
    }

    #[test]
    fn test_created_at_backs_the_timestamp() {
        let created_at = Local.with_ymd_and_hms(2026, 8, 30, 14, 5, 9).unwrap();
        let entry = HistoryEntry::with_created_at("hello".to_string(), created_at);
        assert_eq!(entry.created_at(), created_at);
        assert_eq!(entry.timestamp(), "2026-08-30_14-05-09");
    }

    #[test]
    fn test_summary_truncates_long_text() {
        let entry = fixed_entry("https://example.com/some/very/long/path");
        assert_eq!(
            entry.summary(),
            "https://example.com/... (2026-08-30_14-05-09)"
        );

        let short = fixed_entry("short");
        assert_eq!(short.summary(), "short (2026-08-30_14-05-09)");
    }

    #[test]
    fn test_resolve_clears_pending() {
        let mut entry = fixed_entry("hello");
        assert!(entry.is_pending());

        entry.resolve(PathBuf::from("qrcodes/qrcode_2026-08-30_14-05-09.png"));
        assert!(!entry.is_pending());
        assert_eq!(
            entry.saved_path(),
            Some(Path::new("qrcodes/qrcode_2026-08-30_14-05-09.png"))
        );
    }
}
