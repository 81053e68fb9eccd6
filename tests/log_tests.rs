//! Tests for the value log
//!
//! These tests verify:
//! - Appends return contiguous Locations
//! - Positional reads return exactly the appended bytes
//! - Reads past EOF fail as truncated, not as a short success

use duramap::log::{Location, LogReader, LogWriter};
use duramap::DuraError;
use tempfile::TempDir;

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_returns_contiguous_locations() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.dmlog");

    let mut writer = LogWriter::create(&path).unwrap();
    let first = writer.append(b"hello").unwrap();
    let second = writer.append(b"worlds").unwrap();

    assert_eq!(first, Location::new(0, 5));
    assert_eq!(second, Location::new(5, 6));
    assert_eq!(writer.bytes_written(), 11);

    writer.finish(true).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 11);
}

#[test]
fn test_create_truncates_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.dmlog");

    std::fs::write(&path, b"leftover bytes").unwrap();

    let writer = LogWriter::create(&path).unwrap();
    writer.finish(false).unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_back_exact_ranges() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.dmlog");

    let mut writer = LogWriter::create(&path).unwrap();
    let first = writer.append(b"alpha").unwrap();
    let second = writer.append(b"beta").unwrap();
    writer.finish(true).unwrap();

    let mut reader = LogReader::open(&path).unwrap();
    assert_eq!(reader.read(second).unwrap(), b"beta");
    assert_eq!(reader.read(first).unwrap(), b"alpha"); // backwards seek works
}

#[test]
fn test_read_past_eof_is_truncated() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.dmlog");

    let mut writer = LogWriter::create(&path).unwrap();
    writer.append(b"short").unwrap();
    writer.finish(true).unwrap();

    let mut reader = LogReader::open(&path).unwrap();
    let result = reader.read(Location::new(0, 100));

    match result {
        Err(DuraError::Truncated { offset, expected }) => {
            assert_eq!(offset, 0);
            assert_eq!(expected, 100);
        }
        other => panic!("expected Truncated, got {:?}", other),
    }
}

#[test]
fn test_read_from_offset_past_eof_is_truncated() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.dmlog");

    let writer = LogWriter::create(&path).unwrap();
    writer.finish(true).unwrap();

    let mut reader = LogReader::open(&path).unwrap();
    assert!(matches!(
        reader.read(Location::new(40, 4)),
        Err(DuraError::Truncated { .. })
    ));
}
