use crate::filter::Filter;
use crate::task::Task;

/// Result of projecting a collection through the active filter. The empty
/// case is its own variant so the collaborator can render a placeholder
/// instead of a zero-row list.
#[derive(Debug)]
pub enum Projection<'a> {
    Empty,
    List(Vec<&'a Task>),
}

/// Subsequence of `tasks` admitted by `filter`, in collection order.
pub fn visible_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.admits(task)).collect()
}

/// Count of unfinished tasks over the whole collection. Deliberately
/// independent of the active filter: the "all done" decision is driven by
/// every task, not the visible subset.
pub fn remaining(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| !task.done).count()
}

pub fn project(tasks: &[Task], filter: Filter) -> Projection<'_> {
    let visible = visible_tasks(tasks, filter);
    if visible.is_empty() {
        Projection::Empty
    } else {
        Projection::List(visible)
    }
}
