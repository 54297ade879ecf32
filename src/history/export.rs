//! CSV export of the history ledger

use crate::error::Result;
use crate::history::{HistoryEntry, NOT_DOWNLOADED};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the full history to `path` as CSV, overwriting any previous export.
///
/// One header row (`Index,Text,Timestamp,Filename`) followed by one row per
/// entry in append order with a 1-based index. Entries that were never
/// downloaded get the literal filename marker `Not downloaded`. Rows are
/// CRLF-terminated per RFC 4180.
pub fn write_csv(entries: &[HistoryEntry], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write!(writer, "Index,Text,Timestamp,Filename\r\n")?;
    for (index, entry) in entries.iter().enumerate() {
        let filename = entry
            .saved_path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| NOT_DOWNLOADED.to_string());
        write!(
            writer,
            "{},{},{},{}\r\n",
            index + 1,
            escape_field(entry.text()),
            escape_field(&entry.timestamp()),
            escape_field(&filename),
        )?;
    }
    writer.flush()?;

    Ok(())
}

/// Quote a field when it contains a delimiter, quote, or newline (RFC 4180).
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
