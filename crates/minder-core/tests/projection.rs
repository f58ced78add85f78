use chrono::{DateTime, TimeZone, Utc};
use minder_core::filter::Filter;
use minder_core::storage::Storage;
use minder_core::store::TaskStore;
use minder_core::task::Task;
use minder_core::view::{self, Projection};
use tempfile::tempdir;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0)
        .single()
        .expect("valid now")
}

fn sample_tasks() -> Vec<Task> {
    let now = fixed_now();
    let open_one = Task::new("write report".to_string(), None, now);
    let mut done_one = Task::new("send invoice".to_string(), None, now);
    let open_two = Task::new("call dentist".to_string(), None, now);
    done_one.done = true;
    vec![open_one, done_one, open_two]
}

#[test]
fn all_filter_shows_everything_in_order() {
    let tasks = sample_tasks();
    let visible = view::visible_tasks(&tasks, Filter::All);
    let texts: Vec<&str> = visible.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["write report", "send invoice", "call dentist"]);
}

#[test]
fn active_filter_hides_done_tasks() {
    let tasks = sample_tasks();
    let visible = view::visible_tasks(&tasks, Filter::Active);
    let texts: Vec<&str> = visible.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["write report", "call dentist"]);
}

#[test]
fn done_filter_shows_only_done_tasks() {
    let tasks = sample_tasks();
    let visible = view::visible_tasks(&tasks, Filter::Done);
    let texts: Vec<&str> = visible.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["send invoice"]);
}

#[test]
fn remaining_counts_whole_collection_regardless_of_filter() {
    let tasks = sample_tasks();

    // The summary is always computed over the full collection; narrowing
    // the visible subset must not change it.
    assert_eq!(view::remaining(&tasks), 2);
    assert_eq!(view::visible_tasks(&tasks, Filter::Done).len(), 1);
    assert_eq!(view::remaining(&tasks), 2);
}

#[test]
fn empty_collection_projects_empty() {
    assert!(matches!(view::project(&[], Filter::All), Projection::Empty));
}

#[test]
fn fully_done_collection_projects_empty_under_active() {
    let now = fixed_now();
    let mut task = Task::new("finished".to_string(), None, now);
    task.done = true;
    let tasks = vec![task];

    assert!(matches!(
        view::project(&tasks, Filter::Active),
        Projection::Empty
    ));
    assert!(matches!(
        view::project(&tasks, Filter::Done),
        Projection::List(_)
    ));
}

#[test]
fn buy_milk_scenario_end_to_end() {
    let temp = tempdir().expect("tempdir");
    let mut store = TaskStore::open(Storage::open(temp.path()).expect("open storage"));
    let now = fixed_now();

    let id = store
        .create("Buy milk", None, now)
        .expect("create")
        .expect("task created");

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].text, "Buy milk");
    assert!(!store.tasks()[0].done);
    assert_eq!(store.tasks()[0].due_date, None);

    store.toggle(id).expect("toggle");
    assert!(store.tasks()[0].done);
    assert_eq!(view::remaining(store.tasks()), 0);

    store.set_filter(Filter::Done);
    let visible = view::visible_tasks(store.tasks(), store.filter());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, id);

    store.set_filter(Filter::Active);
    assert!(matches!(
        view::project(store.tasks(), store.filter()),
        Projection::Empty
    ));
}
