use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::filter::Filter;
use crate::seed::SeedSource;
use crate::storage::Storage;
use crate::task::Task;

/// Read-only view of the store handed to observers and the projector.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub tasks: &'a [Task],
    pub filter: Filter,
}

/// Callback invoked after every state change with the fresh snapshot.
pub type Observer = Box<dyn FnMut(Snapshot<'_>)>;

/// Sole owner of the task collection and the active filter. Every mutating
/// operation persists before control returns to the caller, then notifies
/// the registered observers.
pub struct TaskStore {
    storage: Storage,
    tasks: Vec<Task>,
    filter: Filter,
    observers: Vec<Observer>,
}

impl TaskStore {
    /// Rehydrates from the durable store. Unreadable data starts empty
    /// rather than failing; see [`Storage::load_tasks`].
    #[instrument(skip(storage))]
    pub fn open(storage: Storage) -> Self {
        let tasks = storage.load_tasks();
        info!(count = tasks.len(), "opened task store");
        Self {
            storage,
            tasks,
            filter: Filter::All,
            observers: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tasks: &self.tasks,
            filter: self.filter,
        }
    }

    /// Registers an observer invoked after every state change.
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    /// Prepends a task with trimmed `text`. Blank text creates nothing: no
    /// write, no notification.
    #[instrument(skip(self, text, now))]
    pub fn create(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Uuid>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("blank task text; nothing created");
            return Ok(None);
        }

        let task = Task::new(trimmed.to_string(), due_date, now);
        let id = task.id;
        self.tasks.insert(0, task);
        self.persist()?;
        self.notify();
        info!(%id, "created task");
        Ok(Some(id))
    }

    /// Flips `done` on the matching task. An unknown id is a silent no-op.
    #[instrument(skip(self))]
    pub fn toggle(&mut self, id: Uuid) -> anyhow::Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(%id, "toggle target not found");
            return Ok(false);
        };

        task.done = !task.done;
        debug!(%id, done = task.done, "toggled task");
        self.persist()?;
        self.notify();
        Ok(true)
    }

    /// Replaces the matching task's text with the trimmed `new_text`. A
    /// blank replacement leaves the text as it was and writes nothing, but
    /// observers are still notified so the display recovers from an
    /// abandoned edit.
    #[instrument(skip(self, new_text))]
    pub fn edit(&mut self, id: Uuid, new_text: &str) -> anyhow::Result<bool> {
        let trimmed = new_text.trim();
        let mut changed = false;

        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            if !trimmed.is_empty() && task.text != trimmed {
                task.text = trimmed.to_string();
                changed = true;
            }
        } else {
            debug!(%id, "edit target not found");
        }

        if changed {
            self.persist()?;
            info!(%id, "edited task");
        }
        self.notify();
        Ok(changed)
    }

    /// Removes the matching task. An unknown id is a silent no-op.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: Uuid) -> anyhow::Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!(%id, "remove target not found");
            return Ok(false);
        }

        self.persist()?;
        self.notify();
        info!(%id, "removed task");
        Ok(true)
    }

    /// Drops every completed task. When none are completed the persisted
    /// bytes are left untouched and no notification fires.
    #[instrument(skip(self))]
    pub fn clear_completed(&mut self) -> anyhow::Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.done);
        let removed = before - self.tasks.len();
        if removed == 0 {
            debug!("no completed tasks to clear");
            return Ok(0);
        }

        self.persist()?;
        self.notify();
        info!(removed, "cleared completed tasks");
        Ok(removed)
    }

    /// Stable reorder by due date ascending; undated tasks go after every
    /// dated one, and ties keep their relative order. The new order is
    /// persisted.
    #[instrument(skip(self))]
    pub fn sort_by_due(&mut self) -> anyhow::Result<()> {
        self.tasks
            .sort_by(|a, b| match (a.due_date, b.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        self.persist()?;
        self.notify();
        info!("sorted tasks by due date");
        Ok(())
    }

    /// Session-scoped: observers are notified, nothing is persisted.
    #[instrument(skip(self))]
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        debug!(filter = filter.as_str(), "filter changed");
        self.notify();
    }

    /// Best-effort one-time population. The source is consulted only when
    /// the collection is empty, and emptiness is re-checked before the
    /// fetched items are appended in case a task arrived while the fetch
    /// was in flight. A fetch failure leaves the collection untouched.
    #[instrument(skip(self, source, now))]
    pub fn seed(&mut self, source: &dyn SeedSource, now: DateTime<Utc>) -> anyhow::Result<usize> {
        if !self.tasks.is_empty() {
            debug!("store already populated; skipping seed");
            return Ok(0);
        }

        let items = source.fetch()?;

        if !self.tasks.is_empty() {
            debug!("tasks appeared during fetch; discarding seed payload");
            return Ok(0);
        }

        let seeded: Vec<Task> = items
            .into_iter()
            .filter_map(|item| {
                let text = item.title.trim().to_string();
                if text.is_empty() {
                    warn!("skipping seed item with blank title");
                    return None;
                }
                let mut task = Task::new(text, None, now);
                task.done = item.completed;
                Some(task)
            })
            .collect();

        let count = seeded.len();
        self.tasks.extend(seeded);
        self.persist()?;
        self.notify();
        info!(count, "seeded starter tasks");
        Ok(count)
    }

    fn persist(&self) -> anyhow::Result<()> {
        self.storage.save_tasks(&self.tasks)
    }

    fn notify(&mut self) {
        let snapshot = Snapshot {
            tasks: &self.tasks,
            filter: self.filter,
        };
        for observer in &mut self.observers {
            observer(snapshot);
        }
    }
}
