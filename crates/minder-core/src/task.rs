use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,

    pub text: String,

    #[serde(default)]
    pub done: bool,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// `text` must already be trimmed and non-empty; the store enforces that
    /// before constructing.
    pub fn new(text: String, due_date: Option<NaiveDate>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            done: false,
            created_at: now,
            due_date,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.due_date.map(|due| due < today).unwrap_or(false)
    }

    /// Leading slice of the simple uuid form, long enough to address tasks
    /// from the command line.
    pub fn short_id(&self) -> String {
        let simple = self.id.simple().to_string();
        simple[..8].to_string()
    }
}
