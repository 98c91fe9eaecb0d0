// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agx_core::FakeClock;
use agx_store::Store;
use tempfile::TempDir;

fn drive_store() -> (TempDir, DriveStore) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("agents-home"));
    store.ensure_layout().unwrap();
    let home = dir.path().join("user-home");
    std::fs::create_dir_all(&home).unwrap();
    (dir, DriveStore::new(store, home))
}

#[test]
fn create_and_get_file_drive() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_767_225_600_000);
    let drive = drives
        .create("api", Some("API notes"), Some("~/code/api"), &clock)
        .unwrap();
    assert_eq!(drive.name, "api");
    assert_eq!(drive.body, DriveBody::File);
    assert_eq!(drive.front.description.as_deref(), Some("API notes"));
    assert!(!drive.front.updated.is_empty());

    assert!(drives.get("api").is_some());
    assert!(drives.get("missing").is_none());
}

#[test]
fn create_duplicate_fails() {
    let (_dir, drives) = drive_store();
    drives.create("api", None, None, &FakeClock::new()).unwrap();
    assert!(matches!(
        drives.create("api", None, None, &FakeClock::new()),
        Err(DriveError::AlreadyExists(_))
    ));
}

#[test]
fn list_is_sorted() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    drives.create("zeta", None, None, &clock).unwrap();
    drives.create("alpha", None, None, &clock).unwrap();
    let names: Vec<String> = drives.list().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn resolve_by_project_expands_tilde() {
    let (dir, drives) = drive_store();
    let project = dir.path().join("user-home/code/api");
    std::fs::create_dir_all(&project).unwrap();
    drives
        .create("api", None, Some("~/code/api"), &FakeClock::new())
        .unwrap();
    let found = drives.resolve_by_project(&project).unwrap();
    assert_eq!(found.name, "api");
    assert!(drives.resolve_by_project(&dir.path().join("elsewhere")).is_none());
}

#[test]
fn add_note_promotes_file_drive() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    drives.create("api", None, None, &clock).unwrap();

    let path = drives
        .add_note("api", "Design Decision!", "We chose Postgres.", &clock)
        .unwrap();

    // Promoted to a directory drive
    let drive = drives.get("api").unwrap();
    assert_eq!(drive.body, DriveBody::Directory);
    assert!(drive.path.join("overview.md").is_file());

    // Note file name is timestamp + slug
    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.ends_with("-design-decision.md"), "{file_name}");
    let note = std::fs::read_to_string(&path).unwrap();
    assert!(note.contains("title: Design Decision!"));
    assert!(note.contains("We chose Postgres."));
}

#[test]
fn add_note_to_directory_drive_appends() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    drives.create("api", None, None, &clock).unwrap();
    drives.add_note("api", "first", "a", &clock).unwrap();
    clock.advance(std::time::Duration::from_secs(60));
    drives.add_note("api", "second", "b", &clock).unwrap();

    let drive = drives.get("api").unwrap();
    let notes: Vec<_> = std::fs::read_dir(drive.path.join("notes"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(notes.len(), 2);
}

#[test]
fn add_note_to_missing_drive_fails() {
    let (_dir, drives) = drive_store();
    assert!(matches!(
        drives.add_note("ghost", "t", "c", &FakeClock::new()),
        Err(DriveError::NotFound(_))
    ));
}

#[test]
fn install_file_and_directory_drives() {
    let (dir, drives) = drive_store();
    let src_file = dir.path().join("notes.md");
    std::fs::write(&src_file, "---\nname: notes\nupdated: x\n---\nbody").unwrap();
    drives.install_from_path("notes", &src_file).unwrap();
    assert_eq!(drives.get("notes").unwrap().body, DriveBody::File);

    let src_dir = dir.path().join("proj-drive");
    std::fs::create_dir_all(src_dir.join("notes")).unwrap();
    std::fs::write(src_dir.join("overview.md"), "o").unwrap();
    std::fs::write(src_dir.join("notes/n.md"), "n").unwrap();
    drives.install_from_path("proj", &src_dir).unwrap();
    let drive = drives.get("proj").unwrap();
    assert_eq!(drive.body, DriveBody::Directory);
    assert!(drive.path.join("notes/n.md").is_file());
}

#[test]
fn large_detection_for_files_and_dirs() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    let small = drives.create("small", None, None, &clock).unwrap();
    assert!(!drives.is_large(&small));

    let big = drives.create("big", None, None, &clock).unwrap();
    std::fs::write(&big.path, "x".repeat(LARGE_FILE_BYTES as usize + 1)).unwrap();
    let big = drives.get("big").unwrap();
    assert!(drives.is_large(&big));

    let many = drives.create("many", None, None, &clock).unwrap();
    drop(many);
    for i in 0..=LARGE_DIR_FILES {
        drives
            .add_note("many", &format!("note {i}"), "x", &clock)
            .unwrap();
        clock.advance(std::time::Duration::from_millis(1500));
    }
    let many = drives.get("many").unwrap();
    assert!(drives.is_large(&many));
}

#[test]
fn read_content_concatenates_directory_drives() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    drives.create("api", None, None, &clock).unwrap();
    drives.add_note("api", "decision", "Postgres.", &clock).unwrap();
    let drive = drives.get("api").unwrap();
    let content = drives.read_content(&drive).unwrap();
    assert!(content.contains("## overview.md"));
    assert!(content.contains("Postgres."));
}

#[test]
fn file_in_drive_checks_existence() {
    let (_dir, drives) = drive_store();
    let clock = FakeClock::new();
    drives.create("api", None, None, &clock).unwrap();
    drives.add_note("api", "n", "x", &clock).unwrap();
    let drive = drives.get("api").unwrap();
    assert!(drives.file_in_drive(&drive, "overview.md").is_ok());
    assert!(matches!(
        drives.file_in_drive(&drive, "nope.md"),
        Err(DriveError::FileNotFound { .. })
    ));
}
