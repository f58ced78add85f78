use std::cell::Cell;
use std::fs;

use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use minder_core::seed::{SeedItem, SeedSource};
use minder_core::storage::Storage;
use minder_core::store::TaskStore;
use tempfile::tempdir;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0)
        .single()
        .expect("valid now")
}

struct FakeSource {
    items: Vec<SeedItem>,
    calls: Cell<usize>,
}

impl FakeSource {
    fn new(items: Vec<SeedItem>) -> Self {
        Self {
            items,
            calls: Cell::new(0),
        }
    }
}

impl SeedSource for FakeSource {
    fn fetch(&self) -> anyhow::Result<Vec<SeedItem>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.items.clone())
    }
}

struct FailingSource;

impl SeedSource for FailingSource {
    fn fetch(&self) -> anyhow::Result<Vec<SeedItem>> {
        Err(anyhow!("connection refused"))
    }
}

fn item(title: &str, completed: bool) -> SeedItem {
    SeedItem {
        title: title.to_string(),
        completed,
    }
}

#[test]
fn seed_populates_empty_store() {
    let temp = tempdir().expect("tempdir");
    let mut store = TaskStore::open(Storage::open(temp.path()).expect("open storage"));
    let source = FakeSource::new(vec![
        item("delectus aut autem", false),
        item("quis ut nam", true),
    ]);

    let count = store.seed(&source, fixed_now()).expect("seed");
    assert_eq!(count, 2);
    assert_eq!(source.calls.get(), 1);

    let tasks = store.tasks();
    assert_eq!(tasks[0].text, "delectus aut autem");
    assert!(!tasks[0].done);
    assert_eq!(tasks[1].text, "quis ut nam");
    assert!(tasks[1].done);
    assert!(tasks.iter().all(|task| task.due_date.is_none()));

    // Seeded tasks are persisted, not just held in memory.
    let reopened = TaskStore::open(Storage::open(temp.path()).expect("reopen storage"));
    assert_eq!(reopened.tasks().len(), 2);
}

#[test]
fn seed_skips_populated_store_without_fetching() {
    let temp = tempdir().expect("tempdir");
    let mut store = TaskStore::open(Storage::open(temp.path()).expect("open storage"));
    store
        .create("already here", None, fixed_now())
        .expect("create").expect("task created");

    let source = FakeSource::new(vec![item("unwanted", false)]);
    let count = store.seed(&source, fixed_now()).expect("seed");

    assert_eq!(count, 0);
    assert_eq!(source.calls.get(), 0);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].text, "already here");
}

#[test]
fn seed_failure_leaves_collection_untouched() {
    let temp = tempdir().expect("tempdir");
    let mut store = TaskStore::open(Storage::open(temp.path()).expect("open storage"));

    let tasks_path = store.storage().tasks_path.clone();
    let before = fs::read(&tasks_path).expect("read before");

    assert!(store.seed(&FailingSource, fixed_now()).is_err());
    assert!(store.tasks().is_empty());

    let after = fs::read(&tasks_path).expect("read after");
    assert_eq!(before, after);
}

#[test]
fn seed_drops_items_with_blank_titles() {
    let temp = tempdir().expect("tempdir");
    let mut store = TaskStore::open(Storage::open(temp.path()).expect("open storage"));
    let source = FakeSource::new(vec![
        item("", false),
        item("   ", true),
        item("worth keeping", false),
    ]);

    let count = store.seed(&source, fixed_now()).expect("seed");
    assert_eq!(count, 1);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].text, "worth keeping");
}
