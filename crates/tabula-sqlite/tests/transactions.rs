//! Tests for transactions and connection reference counting through the
//! storage.

mod common;
use common::*;

use std::cell::Cell;
use std::rc::Rc;

use tabula_sqlite::{Storage, StorageOptions};
use tempfile::TempDir;

#[test]
fn transaction_commits_on_true() {
    let storage = memory_storage();

    let committed = storage
        .transaction(|s| {
            s.insert(&employee("A", 1))?;
            s.insert(&employee("B", 2))?;
            Ok(true)
        })
        .unwrap();

    assert!(committed);
    assert_eq!(storage.count::<Employee>(&[]).unwrap(), 2);
}

#[test]
fn transaction_rolls_back_on_false() {
    let storage = memory_storage();

    let committed = storage
        .transaction(|s| {
            s.insert(&employee("A", 1))?;
            Ok(false)
        })
        .unwrap();

    assert!(!committed);
    assert_eq!(storage.count::<Employee>(&[]).unwrap(), 0);
    assert!(!storage.in_transaction());
}

#[test]
fn commit_without_begin_fails_and_keeps_count() {
    let storage = memory_storage();
    let before = storage.connection_holder().retain_count();

    assert!(storage.commit().is_err());
    assert_eq!(storage.connection_holder().retain_count(), before);
}

#[test]
fn file_database_opens_once_per_cycle() {
    let dir = TempDir::new().unwrap();
    let opens = Rc::new(Cell::new(0));
    let counter = Rc::clone(&opens);
    let options = StorageOptions::new().on_open(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });
    let storage =
        Storage::with_options(db_path(&dir, "tx.db").to_string_lossy(), schema(), options)
            .unwrap();

    storage.sync_schema(false).unwrap();
    assert_eq!(opens.get(), 1);

    storage
        .transaction(|s| {
            s.insert(&employee("A", 1))?;
            s.insert(&employee("B", 2))?;
            assert!(s.is_opened());
            Ok(true)
        })
        .unwrap();
    assert_eq!(opens.get(), 2);
    assert!(!storage.is_opened());

    storage.count::<Employee>(&[]).unwrap();
    assert_eq!(opens.get(), 3);
}

#[test]
fn open_forever_keeps_file_database_open() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_options(
        db_path(&dir, "pinned.db").to_string_lossy(),
        schema(),
        StorageOptions::new().open_forever(true),
    )
    .unwrap();

    assert!(storage.is_opened());
    storage.sync_schema(false).unwrap();
    let id = storage.insert(&employee("A", 1)).unwrap();
    assert_eq!(storage.last_insert_rowid().unwrap(), id);
    assert!(storage.is_opened());
}

#[test]
fn dropping_inside_transaction_rolls_back() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir, "dropped.db");
    {
        let storage = Storage::open(path.to_string_lossy(), schema()).unwrap();
        storage.sync_schema(false).unwrap();
        storage.begin_transaction().unwrap();
        storage.insert(&employee("A", 1)).unwrap();
    }

    let storage = Storage::open(path.to_string_lossy(), schema()).unwrap();
    assert_eq!(storage.count::<Employee>(&[]).unwrap(), 0);
}

#[test]
fn user_version_round_trips() {
    let storage = memory_storage();
    assert_eq!(storage.user_version().unwrap(), 0);

    storage.set_user_version(7).unwrap();
    assert_eq!(storage.user_version().unwrap(), 7);
}

#[test]
fn failed_begin_gives_back_its_retain() {
    let dir = TempDir::new().unwrap();
    let parent = dir.path().join("later");
    let path = parent.join("tx.db");
    let storage = Storage::open(path.to_string_lossy(), schema()).unwrap();

    assert!(storage.begin_transaction().is_err());
    assert_eq!(storage.connection_holder().retain_count(), 0);
    assert!(!storage.in_transaction());

    std::fs::create_dir_all(&parent).unwrap();
    storage.sync_schema(false).unwrap();
    storage.transaction(|s| s.insert(&employee("A", 1)).map(|_| true)).unwrap();
    assert_eq!(storage.count::<Employee>(&[]).unwrap(), 1);
    assert!(!storage.is_opened());
}
