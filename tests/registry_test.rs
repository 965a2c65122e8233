//! Integration tests for the folder registry
//!
//! Run with: cargo test --test registry_test

use std::thread;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use teleshelf::registry::{FileKind, FolderPath, FolderRegistry, RegistryError};

fn open_registry() -> (TempDir, FolderRegistry) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("registry.sqlite");
    let registry = FolderRegistry::open(db_path.to_str().unwrap()).unwrap();
    (dir, registry)
}

#[test]
fn create_folder_then_duplicate_fails_with_already_exists() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    registry.create_folder(&root, "Docs").unwrap();
    let err = registry.create_folder(&root, "Docs").unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExists(_)));

    let listing = registry.list_children(&root).unwrap();
    assert_eq!(listing.subfolders, vec!["Docs".to_string()]);
}

#[test]
fn create_folder_under_missing_parent_fails_with_not_found() {
    let (_dir, registry) = open_registry();
    let ghost = FolderPath::from_segments(["Ghost"]).unwrap();

    let err = registry.create_folder(&ghost, "Child").unwrap_err();
    assert!(matches!(err, RegistryError::FolderNotFound(_)));
}

#[test]
fn create_folder_validates_names() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    assert!(matches!(
        registry.create_folder(&root, ""),
        Err(RegistryError::InvalidName(_))
    ));
    assert!(matches!(
        registry.create_folder(&root, "a/b"),
        Err(RegistryError::InvalidName(_))
    ));
    assert!(matches!(
        registry.create_folder(&root, &"x".repeat(101)),
        Err(RegistryError::InvalidName(_))
    ));
    // Exactly at the bound is fine
    registry.create_folder(&root, &"x".repeat(100)).unwrap();
}

#[test]
fn delete_folder_cascades_over_the_whole_subtree() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    let f = registry.create_folder(&root, "F").unwrap();
    let f1 = registry.create_folder(&f, "F1").unwrap();
    registry.create_folder(&f, "F2").unwrap();
    registry.add_file(&f1, "file1.pdf", "id-1", FileKind::Document).unwrap();

    registry.delete_folder(&root, "F").unwrap();

    for path in [&f, &f1] {
        assert!(matches!(
            registry.list_children(path),
            Err(RegistryError::FolderNotFound(_))
        ));
    }
    let stats = registry.stats().unwrap();
    assert_eq!((stats.folders, stats.files), (0, 0));
}

#[test]
fn delete_folder_does_not_touch_similarly_prefixed_siblings() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    let ab = registry.create_folder(&root, "ab").unwrap();
    let abc = registry.create_folder(&root, "abc").unwrap();
    registry.add_file(&abc, "keep.pdf", "id-keep", FileKind::Document).unwrap();

    registry.delete_folder(&root, "ab").unwrap();

    assert!(matches!(
        registry.list_children(&ab),
        Err(RegistryError::FolderNotFound(_))
    ));
    // "abc" is not a descendant of "ab"
    let listing = registry.list_children(&abc).unwrap();
    assert_eq!(listing.files.len(), 1);
}

#[test]
fn delete_missing_folder_fails_with_not_found() {
    let (_dir, registry) = open_registry();
    let err = registry.delete_folder(&FolderPath::root(), "Nope").unwrap_err();
    assert!(matches!(err, RegistryError::FolderNotFound(_)));
}

#[test]
fn add_file_upserts_with_last_write_wins() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();
    let docs = registry.create_folder(&root, "Docs").unwrap();

    registry.add_file(&docs, "x.pdf", "id1", FileKind::Document).unwrap();
    registry.add_file(&docs, "x.pdf", "id2", FileKind::Document).unwrap();

    let file = registry.resolve_file(&docs, "x.pdf").unwrap();
    assert_eq!(file.file_id, "id2");
    assert_eq!(registry.list_children(&docs).unwrap().files.len(), 1);
}

#[test]
fn resolve_file_on_missing_entries_fails_with_not_found() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();
    let docs = registry.create_folder(&root, "Docs").unwrap();

    assert!(matches!(
        registry.resolve_file(&docs, "never.pdf"),
        Err(RegistryError::FileNotFound(_))
    ));
    let ghost = FolderPath::from_segments(["Ghost"]).unwrap();
    assert!(matches!(
        registry.resolve_file(&ghost, "never.pdf"),
        Err(RegistryError::FolderNotFound(_))
    ));
}

#[test]
fn delete_file_distinguishes_already_gone() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();
    let docs = registry.create_folder(&root, "Docs").unwrap();
    registry.add_file(&docs, "x.pdf", "id1", FileKind::Document).unwrap();

    registry.delete_file(&docs, "x.pdf").unwrap();
    let err = registry.delete_file(&docs, "x.pdf").unwrap_err();
    assert!(matches!(err, RegistryError::FileNotFound(_)));
}

#[test]
fn lectures_scenario() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();
    let lectures = registry.create_folder(&root, "Lectures").unwrap();
    registry
        .add_file(&lectures, "intro.pdf", "ABC123", FileKind::Document)
        .unwrap();

    let root_listing = registry.list_children(&root).unwrap();
    assert_eq!(root_listing.subfolders, vec!["Lectures".to_string()]);
    assert!(root_listing.files.is_empty());

    let lectures_listing = registry.list_children(&lectures).unwrap();
    assert!(lectures_listing.subfolders.is_empty());
    assert_eq!(lectures_listing.files.len(), 1);
    assert_eq!(lectures_listing.files[0].filename, "intro.pdf");

    let file = registry.resolve_file(&lectures, "intro.pdf").unwrap();
    assert_eq!(file.file_id, "ABC123");
}

#[test]
fn listings_are_sorted_lexicographically() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    for name in ["zeta", "alpha", "mid"] {
        registry.create_folder(&root, name).unwrap();
    }
    for (name, id) in [("b.txt", "2"), ("a.txt", "1"), ("c.txt", "3")] {
        registry.add_file(&root, name, id, FileKind::Document).unwrap();
    }

    let listing = registry.list_children(&root).unwrap();
    assert_eq!(listing.subfolders, vec!["alpha", "mid", "zeta"]);
    let names: Vec<_> = listing.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn stats_exclude_the_root_folder() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    assert_eq!(registry.stats().unwrap().folders, 0);

    let docs = registry.create_folder(&root, "Docs").unwrap();
    registry.create_folder(&docs, "Inner").unwrap();
    registry.add_file(&docs, "a.pdf", "id-a", FileKind::Document).unwrap();

    let stats = registry.stats().unwrap();
    assert_eq!((stats.folders, stats.files), (2, 1));
}

#[test]
fn reopening_the_database_reconstructs_the_identical_tree() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("registry.sqlite");
    let db_path = db_path.to_str().unwrap();

    let lectures = {
        let registry = FolderRegistry::open(db_path).unwrap();
        let lectures = registry.create_folder(&FolderPath::root(), "Lectures").unwrap();
        registry
            .add_file(&lectures, "intro.pdf", "ABC123", FileKind::Photo)
            .unwrap();
        lectures
    };

    let reopened = FolderRegistry::open(db_path).unwrap();
    let listing = reopened.list_children(&lectures).unwrap();
    assert_eq!(listing.files.len(), 1);
    let file = reopened.resolve_file(&lectures, "intro.pdf").unwrap();
    assert_eq!(file.file_id, "ABC123");
    assert_eq!(file.kind, FileKind::Photo);
}

#[test]
fn concurrent_duplicate_creates_resolve_to_exactly_one_winner() {
    let (_dir, registry) = open_registry();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.create_folder(&FolderPath::root(), "dup"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let dup_count = results
        .iter()
        .filter(|r| matches!(r, Err(RegistryError::AlreadyExists(_))))
        .count();
    assert_eq!((ok_count, dup_count), (1, 1));

    let listing = registry.list_children(&FolderPath::root()).unwrap();
    assert_eq!(listing.subfolders, vec!["dup".to_string()]);
}

#[test]
fn empty_filenames_get_deterministic_fallbacks() {
    let (_dir, registry) = open_registry();
    let root = FolderPath::root();

    let first = registry.add_file(&root, "", "AgACAgIAAxkBB", FileKind::Photo).unwrap();
    let second = registry.add_file(&root, "  ", "ZZZZZZZZZZ", FileKind::Photo).unwrap();

    // Different file ids never silently collide on an empty name
    assert_ne!(first, second);
    assert_eq!(registry.list_children(&root).unwrap().files.len(), 2);
}
