//! End-to-end tests for the generate/download/export session flow

use anyhow::Result;
use qrforge::{BoxScale, Color, Error, QrSession, RenderParameters};
use tempfile::TempDir;

fn test_session() -> (QrSession, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let session = QrSession::new(
        dir.path().join("qrcodes"),
        dir.path().join("qr_history_export.csv"),
    );
    (session, dir)
}

#[test]
fn generate_then_download_saves_png_and_resolves_entry() -> Result<()> {
    let (mut session, _dir) = test_session();
    let params = RenderParameters::default();

    session.generate("https://example.com", &params)?;
    assert!(session.ledger().pending().is_some());

    let path = session.download(&params)?;
    assert!(path.exists());
    assert!(path.starts_with(session.output_dir()));
    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("qrcode_"));
    assert!(file_name.ends_with(".png"));

    // The saved file is a decodable PNG carrying the original text.
    let image = image::open(&path)?;
    let mut prepared = rqrr::PreparedImage::prepare(image.to_luma8());
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    let (_meta, content) = grids[0].decode()?;
    assert_eq!(content, "https://example.com");

    let entry = &session.ledger().entries()[0];
    assert_eq!(entry.saved_path(), Some(path.as_path()));
    Ok(())
}

#[test]
fn second_download_without_new_generation_fails() -> Result<()> {
    let (mut session, _dir) = test_session();
    let params = RenderParameters::default();

    session.generate("hello", &params)?;
    session.download(&params)?;

    assert!(matches!(
        session.download(&params),
        Err(Error::NoPendingEntry)
    ));
    Ok(())
}

#[test]
fn download_on_empty_session_fails_and_creates_nothing() {
    let (mut session, dir) = test_session();
    let params = RenderParameters::default();

    assert!(matches!(
        session.download(&params),
        Err(Error::NoPendingEntry)
    ));
    // No output directory, no files.
    assert!(!dir.path().join("qrcodes").exists());
}

#[test]
fn download_uses_parameters_passed_at_download_time() -> Result<()> {
    let (mut session, _dir) = test_session();
    let preview_params = RenderParameters::new(BoxScale::Small, Color::BLACK, Color::WHITE, 1);

    session.generate("parameter drift", &preview_params)?;

    // The user doubled the module scale between generate and download; the
    // saved file follows the newer parameters.
    let download_params = RenderParameters::new(BoxScale::Large, Color::BLACK, Color::WHITE, 1);
    let path = session.download(&download_params)?;

    let saved = image::open(&path)?;
    assert_eq!(saved.width() % BoxScale::Large.module_size(), 0);
    // Small-scale rendering of the same symbol would be half the size.
    let small = qrforge::QrProducer::new().produce("parameter drift", &preview_params)?;
    assert_eq!(saved.width(), small.width() * 2);
    Ok(())
}

#[test]
fn failed_validation_leaves_history_unchanged() {
    let (mut session, _dir) = test_session();
    let params = RenderParameters::default();

    assert!(matches!(
        session.generate("   ", &params),
        Err(Error::Validation(_))
    ));
    assert!(session.ledger().is_empty());
}

#[test]
fn export_empty_session_fails_and_writes_nothing() {
    let (session, dir) = test_session();

    assert!(matches!(session.export(), Err(Error::EmptyLedger)));
    assert!(!dir.path().join("qr_history_export.csv").exists());
}

#[test]
fn export_covers_all_entries_beyond_the_recent_view() -> Result<()> {
    let (mut session, _dir) = test_session();
    let params = RenderParameters::default();

    for i in 1..=6 {
        session.generate(&format!("entry-{i}"), &params)?;
    }

    // The on-screen view is truncated to the newest five...
    let recent: Vec<_> = session.recent().iter().map(|e| e.text()).collect();
    assert_eq!(
        recent,
        ["entry-2", "entry-3", "entry-4", "entry-5", "entry-6"]
    );

    // ...but the export still contains every entry.
    let export_path = session.export()?;
    let contents = std::fs::read_to_string(export_path)?;
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines[0], "Index,Text,Timestamp,Filename");
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("1,entry-1,"));
    assert!(lines[6].starts_with("6,entry-6,"));
    for line in &lines[1..] {
        assert!(line.ends_with(",Not downloaded"));
    }
    Ok(())
}

#[test]
fn export_records_downloaded_and_pending_entries() -> Result<()> {
    let (mut session, _dir) = test_session();
    let params = RenderParameters::default();

    session.generate("hello", &params)?;
    let saved = session.download(&params)?;
    session.generate("world", &params)?;

    session.export()?;
    let contents = std::fs::read_to_string(session.export_path())?;
    let lines: Vec<_> = contents.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,hello,"));
    assert!(lines[1].ends_with(&saved.display().to_string()));
    assert!(lines[2].starts_with("2,world,"));
    assert!(lines[2].ends_with(",Not downloaded"));
    Ok(())
}

#[test]
fn download_after_new_generation_targets_the_new_entry() -> Result<()> {
    let (mut session, _dir) = test_session();
    let params = RenderParameters::default();

    session.generate("first", &params)?;
    session.generate("second", &params)?;

    let path = session.download(&params)?;

    // The first entry stays unresolved forever; the download resolved the
    // latest one.
    let entries = session.ledger().entries();
    assert!(entries[0].is_pending());
    assert_eq!(entries[1].saved_path(), Some(path.as_path()));

    let image = image::open(&path)?;
    let mut prepared = rqrr::PreparedImage::prepare(image.to_luma8());
    let (_meta, content) = prepared.detect_grids()[0].decode()?;
    assert_eq!(content, "second");
    Ok(())
}
