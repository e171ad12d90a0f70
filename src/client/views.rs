//! Derived views over a fetched task list. Nothing here talks to the server.

use std::collections::BTreeMap;

use crate::models::{task::DEFAULT_CATEGORY, Task, TaskStatus};

fn with_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    with_status(tasks, TaskStatus::Completed)
}

pub fn in_progress(tasks: &[Task]) -> Vec<&Task> {
    with_status(tasks, TaskStatus::InProgress)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.not_started + self.in_progress + self.completed
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::NotStarted => self.not_started,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }

    /// Share of tasks in `status`, rounded to a whole percent. `0` for an empty list.
    pub fn percent(&self, status: TaskStatus) -> u8 {
        match self.total() {
            0 => 0,
            total => ((self.count(status) * 100 + total / 2) / total) as u8,
        }
    }
}

pub fn status_summary(tasks: &[Task]) -> StatusSummary {
    tasks
        .iter()
        .fold(StatusSummary::default(), |mut summary, task| {
            match task.status {
                TaskStatus::NotStarted => summary.not_started += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::Completed => summary.completed += 1,
            }
            summary
        })
}

/// Tasks per category label. A blank label counts as the default category.
pub fn category_counts(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        let label = match task.category.trim() {
            "" => DEFAULT_CATEGORY,
            label => label,
        };
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}
