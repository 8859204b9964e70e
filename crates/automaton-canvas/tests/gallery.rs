//! Gallery persistence on disk

use std::fs;

use automaton_canvas::core::Structure;
use automaton_canvas::gallery::{FileStore, Gallery, GalleryError, KeyValueStore, GALLERY_SLOT};
use tempfile::TempDir;

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut gallery = Gallery::new(FileStore::new(dir.path()));
    assert!(gallery.load().unwrap().is_empty());

    assert!(gallery.add(&Structure::default_dfa()).unwrap());
    let path = dir.path().join("previous-structures.json");
    assert!(path.exists());

    // a fresh handle on the same directory sees the saved entry
    let reopened = Gallery::new(FileStore::new(dir.path()));
    assert_eq!(reopened.load().unwrap(), vec![Structure::default_dfa()]);
}

#[test]
fn test_store_directory_created_on_first_write() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("data").join("gallery");
    let mut store = FileStore::new(&nested);
    assert_eq!(store.get(GALLERY_SLOT).unwrap(), None);
    store.set(GALLERY_SLOT, "[]").unwrap();
    assert_eq!(store.get(GALLERY_SLOT).unwrap().as_deref(), Some("[]"));
    assert_eq!(store.dir(), nested.as_path());
}

#[test]
fn test_duplicate_not_written_twice() {
    let dir = TempDir::new().unwrap();
    let mut gallery = Gallery::new(FileStore::new(dir.path()));
    gallery.add(&Structure::default_nfa()).unwrap();
    assert!(!gallery.add(&Structure::default_nfa()).unwrap());
    gallery.add(&Structure::default_dfa()).unwrap();
    assert_eq!(
        gallery.load().unwrap(),
        vec![Structure::default_nfa(), Structure::default_dfa()]
    );
}

#[test]
fn test_slot_is_a_plain_json_array() {
    let dir = TempDir::new().unwrap();
    let mut gallery = Gallery::new(FileStore::new(dir.path()));
    gallery.add(&Structure::default_nfa()).unwrap();
    let raw = fs::read_to_string(gallery.store().path_for(GALLERY_SLOT)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "nfa");
}

#[test]
fn test_corrupt_file_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("previous-structures.json"), "{").unwrap();
    let gallery = Gallery::new(FileStore::new(dir.path()));
    let err = gallery.load().unwrap_err();
    assert!(matches!(err, GalleryError::Corrupt { .. }));
    assert!(err.to_string().contains("previous-structures"));
}

#[test]
fn test_unreadable_slot_is_io_error() {
    let dir = TempDir::new().unwrap();
    // a directory where the slot file should be
    fs::create_dir(dir.path().join("previous-structures.json")).unwrap();
    let err = FileStore::new(dir.path()).get(GALLERY_SLOT).unwrap_err();
    assert!(matches!(err, GalleryError::Io { .. }));
}
