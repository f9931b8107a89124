//! Ordering rules shared by the server flows and list clients: insertion
//! order assignment, completion filtering, and drag-reorder planning.

use crate::models::{OrderUpdate, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }

    /// Pure projection: never mutates stored order, and a filtered subset
    /// keeps the relative sequence of the full set.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

/// Next insertion order for a snapshot the caller already holds: one past the
/// current maximum, 0 for an empty list. Two callers computing this from the
/// same snapshot arrive at the same value; the store tolerates the duplicate.
pub fn next_order(tasks: &[Task]) -> i64 {
    tasks.iter().map(|t| t.order).max().map_or(0, |max| max + 1)
}

/// Map a drag-completed sequence to the order patches that commit it.
///
/// The permuted tasks are assigned the sorted multiset of their own current
/// order values: dragging within a filtered subset only permutes the slots
/// that subset already occupies, so tasks outside the filter keep their
/// positions. For the full list with dense orders this reduces to assigning
/// each task its zero-based position.
pub fn plan_reorder(dragged: &[Task]) -> Vec<OrderUpdate> {
    let mut slots: Vec<i64> = dragged.iter().map(|t| t.order).collect();
    slots.sort_unstable();

    dragged
        .iter()
        .zip(slots)
        .map(|(task, order)| OrderUpdate {
            id: task.id.clone(),
            order,
        })
        .collect()
}
