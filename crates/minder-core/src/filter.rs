use std::str::FromStr;

use anyhow::anyhow;

use crate::task::Task;

/// Which subset of the collection the projector renders. Session-scoped:
/// initialized to `All`, changed only by explicit selection, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Done,
}

impl Filter {
    pub fn admits(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.done,
            Filter::Done => task.done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Done => "done",
        }
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "done" | "completed" => Ok(Filter::Done),
            other => Err(anyhow!("unknown filter: {other} (expected all, active or done)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::Filter;
    use crate::task::Task;

    #[test]
    fn parses_known_filters() {
        assert_eq!("all".parse::<Filter>().expect("parse all"), Filter::All);
        assert_eq!(
            "Active".parse::<Filter>().expect("parse active"),
            Filter::Active
        );
        assert_eq!("done".parse::<Filter>().expect("parse done"), Filter::Done);
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!("overdue".parse::<Filter>().is_err());
    }

    #[test]
    fn admits_by_completion_state() {
        let mut task = Task::new("water the plants".to_string(), None, Utc::now());
        assert!(Filter::All.admits(&task));
        assert!(Filter::Active.admits(&task));
        assert!(!Filter::Done.admits(&task));

        task.done = true;
        assert!(Filter::All.admits(&task));
        assert!(!Filter::Active.admits(&task));
        assert!(Filter::Done.admits(&task));
    }
}
