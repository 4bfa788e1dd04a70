use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sanitize::sanitize;
use crate::storage::Storage;
use crate::task::Task;

/// In-memory task collection in insertion order. Lookups go through the
/// stable task id only. Same persist-first contract as the group store.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    #[instrument(skip(storage))]
    pub fn load(storage: &Storage) -> Self {
        Self {
            tasks: storage.load_tasks(),
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn list_by_group(&self, group_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.group_id == group_id)
            .collect()
    }

    /// Sanitizes and trims the title, mints a fresh id, appends, persists.
    /// The caller is responsible for `group_id` referencing a live group.
    #[instrument(skip(self, storage, title))]
    pub fn create(
        &mut self,
        storage: &Storage,
        title: &str,
        group_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let title = sanitize(title.trim());
        if title.is_empty() {
            return Err(Error::InvalidInput);
        }

        let task = Task::new(title, group_id.to_string(), now);

        let mut next = self.tasks.clone();
        next.push(task.clone());
        storage.save_tasks(&next)?;
        self.tasks = next;

        debug!(id = %task.id, count = self.tasks.len(), "task created");
        Ok(task)
    }

    /// Idempotent beyond the redundant persist.
    #[instrument(skip(self, storage))]
    pub fn set_completed(&mut self, storage: &Storage, id: Uuid, completed: bool) -> Result<()> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        let mut next = self.tasks.clone();
        next[idx].completed = completed;
        storage.save_tasks(&next)?;
        self.tasks = next;

        debug!(id = %id, completed, "task completion set");
        Ok(())
    }

    #[instrument(skip(self, storage))]
    pub fn delete(&mut self, storage: &Storage, id: Uuid) -> Result<()> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        let mut next = self.tasks.clone();
        next.remove(idx);
        storage.save_tasks(&next)?;
        self.tasks = next;

        debug!(id = %id, remaining = self.tasks.len(), "task deleted");
        Ok(())
    }

    /// Removes every completed task of the group. Nothing matching is a
    /// no-op, not an error, and skips the persist. Returns the removed
    /// count.
    #[instrument(skip(self, storage))]
    pub fn delete_completed(&mut self, storage: &Storage, group_id: &str) -> Result<usize> {
        self.retain_persisting(storage, |task| {
            !(task.group_id == group_id && task.completed)
        })
    }

    /// Cascade helper for group deletion: removes every task of the group.
    #[instrument(skip(self, storage))]
    pub fn delete_group_tasks(&mut self, storage: &Storage, group_id: &str) -> Result<usize> {
        self.retain_persisting(storage, |task| task.group_id != group_id)
    }

    fn retain_persisting<F>(&mut self, storage: &Storage, keep: F) -> Result<usize>
    where
        F: Fn(&Task) -> bool,
    {
        let next: Vec<Task> = self.tasks.iter().filter(|task| keep(task)).cloned().collect();
        let removed = self.tasks.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }

        storage.save_tasks(&next)?;
        self.tasks = next;

        debug!(removed, remaining = self.tasks.len(), "tasks removed");
        Ok(removed)
    }
}
