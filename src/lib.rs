//! qrforge - customizable QR code generator with session history
//!
//! This library turns user-entered text into QR code images, tracks every
//! generation in an in-memory session history, saves downloads as PNG files,
//! and exports the full history to CSV.
//!
//! # Example
//!
//! ```no_run
//! use qrforge::{QrSession, RenderParameters};
//!
//! fn main() -> qrforge::Result<()> {
//!     let mut session = QrSession::new("qrcodes", "qr_history_export.csv");
//!     let params = RenderParameters::default();
//!
//!     // Generate a QR code (recorded in the session history)
//!     let _preview = session.generate("https://example.com", &params)?;
//!
//!     // Save the latest generation to qrcodes/qrcode_<timestamp>.png
//!     let path = session.download(&params)?;
//!     println!("Saved to {}", path.display());
//!
//!     // Export the whole history to CSV
//!     session.export()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{LogRotation, LoggingOptions, OutputOptions, QrforgeConfig, RenderOptions};
pub use history::{HistoryEntry, HistoryLedger, RECENT_VIEW_LIMIT};
pub use qr::{BoxScale, Color, QrProducer, RenderParameters};

use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// High-level session combining the QR producer and the history ledger
///
/// Holds the state machine behind the generate/download/export actions: a
/// generation appends a pending history entry, a download resolves the
/// latest pending entry to a PNG on disk, and an export writes the full
/// history to CSV.
pub struct QrSession {
    producer: QrProducer,
    ledger: HistoryLedger,
    output_dir: PathBuf,
    export_path: PathBuf,
}

impl QrSession {
    /// Create a session writing PNGs under `output_dir` and exports to
    /// `export_path`. The history starts empty; nothing is loaded from disk.
    pub fn new(output_dir: impl Into<PathBuf>, export_path: impl Into<PathBuf>) -> Self {
        Self {
            producer: QrProducer::new(),
            ledger: HistoryLedger::new(),
            output_dir: output_dir.into(),
            export_path: export_path.into(),
        }
    }

    /// Create a session with paths taken from configuration.
    pub fn from_config(output: &OutputOptions) -> Self {
        Self::new(output.directory.clone(), output.export_file.clone())
    }

    /// Generate a QR code for `text` and record it in the history.
    ///
    /// Returns the rendered image for preview. Validation or encoding
    /// failures leave the history unchanged; nothing is written to disk.
    pub fn generate(&mut self, text: &str, params: &RenderParameters) -> Result<DynamicImage> {
        let image = self.producer.produce(text, params)?;
        let entry = self.ledger.record_generation(text);
        tracing::info!(timestamp = %entry.timestamp(), "Generated QR code");
        Ok(image)
    }

    /// Save the latest pending generation as a PNG and resolve its entry.
    ///
    /// The image is re-rendered from the parameters passed here, which may
    /// differ from those shown at generation time if the caller changed them
    /// in between. Fails with [`Error::NoPendingEntry`] when there is
    /// nothing new to save; any I/O failure leaves the entry pending so the
    /// download can be retried.
    pub fn download(&mut self, params: &RenderParameters) -> Result<PathBuf> {
        let (text, file_name) = match self.ledger.pending() {
            Some(entry) => (entry.text().to_string(), entry.output_file_name()),
            None => return Err(Error::NoPendingEntry),
        };

        let image = self.producer.produce(&text, params)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        image.save(&path)?;

        self.ledger.resolve_pending(path.clone())?;
        tracing::info!(path = %path.display(), "Saved QR code");
        Ok(path)
    }

    /// Render a terminal preview of `text` without touching the history.
    pub fn preview(&self, text: &str) -> Result<String> {
        self.producer.produce_preview(text)
    }

    /// Export the full history to the session's CSV path.
    ///
    /// Fails with [`Error::EmptyLedger`] when nothing has been generated;
    /// otherwise the previous export is overwritten in full.
    pub fn export(&self) -> Result<PathBuf> {
        if self.ledger.is_empty() {
            return Err(Error::EmptyLedger);
        }

        history::write_csv(self.ledger.entries(), &self.export_path)?;
        tracing::info!(path = %self.export_path.display(), entries = self.ledger.len(), "Exported history");
        Ok(self.export_path.clone())
    }

    /// The session history
    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// Tail of the history shown in the truncated view
    pub fn recent(&self) -> &[HistoryEntry] {
        self.ledger.recent()
    }

    /// Directory downloads are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path exports are written to
    pub fn export_path(&self) -> &Path {
        &self.export_path
    }
}
