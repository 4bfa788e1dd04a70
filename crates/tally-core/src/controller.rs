use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::filter::{self, FilterMode};
use crate::groups::GroupStore;
use crate::storage::Storage;
use crate::task::{Group, Task};
use crate::tasks::TaskStore;

/// Everything the view needs after a mutation: the visible ordered task
/// list for the selected group under the current filter, the group list
/// with the selection marked, and the visible count.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub groups: Vec<Group>,
    pub selected_group: Option<String>,
    pub tasks: Vec<Task>,
    pub filter: FilterMode,
    pub count: usize,
}

/// Sole writer of both collections. Every externally triggered action
/// funnels through here so that the group store, task store, and storage
/// stay mutually consistent before control returns to the view.
#[derive(Debug)]
pub struct SyncController {
    storage: Storage,
    groups: GroupStore,
    tasks: TaskStore,
    filter: FilterMode,
}

impl SyncController {
    /// Loads both collections, seeding the default group on first run.
    #[instrument(skip(storage))]
    pub fn bootstrap(storage: Storage) -> Result<Self> {
        let groups = GroupStore::bootstrap(&storage)?;
        let tasks = TaskStore::load(&storage);
        Ok(Self {
            storage,
            groups,
            tasks,
            filter: FilterMode::All,
        })
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    pub fn selected_group(&self) -> Option<&Group> {
        self.groups.selected()
    }

    pub fn groups(&self) -> &[Group] {
        self.groups.all()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.all()
    }

    fn selected_group_id(&self) -> Result<String> {
        self.groups
            .selected()
            .map(|group| group.id.clone())
            .ok_or(Error::NoGroupSelected)
    }

    /// Creates a task in the currently selected group and returns it, so
    /// the view can render without re-fetching.
    #[instrument(skip(self, title))]
    pub fn add_task(&mut self, title: &str) -> Result<Task> {
        let group_id = self.selected_group_id()?;
        let task = self.tasks.create(&self.storage, title, &group_id, Utc::now())?;
        info!(id = %task.id, group = %group_id, "task added");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub fn remove_task(&mut self, id: Uuid) -> Result<()> {
        self.tasks.delete(&self.storage, id)
    }

    #[instrument(skip(self))]
    pub fn set_task_completion(&mut self, id: Uuid, completed: bool) -> Result<()> {
        self.tasks.set_completed(&self.storage, id, completed)
    }

    /// Removes completed tasks of the selected group; returns how many.
    #[instrument(skip(self))]
    pub fn clear_completed(&mut self) -> Result<usize> {
        let group_id = self.selected_group_id()?;
        self.tasks.delete_completed(&self.storage, &group_id)
    }

    /// Creates a group without selecting it; switching is an explicit,
    /// separate action. Returns the derived id.
    #[instrument(skip(self, name))]
    pub fn add_group(&mut self, name: &str) -> Result<String> {
        self.groups.create(&self.storage, name)
    }

    /// Selects the group and resets the filter to `All`.
    #[instrument(skip(self))]
    pub fn switch_group(&mut self, id: &str) -> Result<RenderState> {
        self.groups.select(&self.storage, id)?;
        self.filter = FilterMode::All;
        Ok(self.render_state())
    }

    /// Deletes the group and every task in it. Tasks go first so the
    /// collections never hold tasks pointing at a missing group; each
    /// save is still a single whole-collection write. When the deleted
    /// group was selected, the group store reassigns selection and the
    /// filter resets.
    #[instrument(skip(self))]
    pub fn delete_group(&mut self, id: &str) -> Result<RenderState> {
        let was_selected = self
            .groups
            .get(id)
            .ok_or_else(|| Error::GroupNotFound(id.to_string()))?
            .selected;

        self.tasks.delete_group_tasks(&self.storage, id)?;
        self.groups.delete(&self.storage, id)?;

        if was_selected {
            self.filter = FilterMode::All;
        }
        info!(id = %id, was_selected, "group deleted");
        Ok(self.render_state())
    }

    /// Sets the filter mode and recomputes the visible list. Never
    /// touches storage.
    #[instrument(skip(self))]
    pub fn apply_filter(&mut self, mode: FilterMode) -> RenderState {
        self.filter = mode;
        self.render_state()
    }

    pub fn render_state(&self) -> RenderState {
        let selected_group = self.groups.selected().map(|group| group.id.clone());

        let tasks: Vec<Task> = match &selected_group {
            Some(id) => filter::apply(&self.tasks.list_by_group(id), self.filter)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        RenderState {
            groups: self.groups.all().to_vec(),
            selected_group,
            count: tasks.len(),
            tasks,
            filter: self.filter,
        }
    }
}
