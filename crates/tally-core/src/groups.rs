use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::sanitize::{sanitize, slugify};
use crate::storage::Storage;
use crate::task::Group;

/// In-memory group collection plus the single-selection invariant:
/// whenever at least one group exists, exactly one carries `selected`.
/// `select` is the only writer of that flag and always clears the others
/// in the same persisted snapshot.
///
/// Mutators persist first and only then replace the in-memory copy, so a
/// failed write leaves memory and disk agreeing.
#[derive(Debug)]
pub struct GroupStore {
    groups: Vec<Group>,
}

impl GroupStore {
    #[instrument(skip(storage))]
    pub fn bootstrap(storage: &Storage) -> Result<Self> {
        let mut groups = storage.load_groups();
        if groups.is_empty() {
            info!("no groups persisted, seeding default group");
            groups.push(Group::seed());
            storage.save_groups(&groups)?;
        }
        Ok(Self { groups })
    }

    pub fn all(&self) -> &[Group] {
        &self.groups
    }

    pub fn get(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn selected(&self) -> Option<&Group> {
        self.groups.iter().find(|group| group.selected)
    }

    /// Derives the id from the sanitized, slugified name and appends the
    /// group unselected. Returns the new id.
    #[instrument(skip(self, storage))]
    pub fn create(&mut self, storage: &Storage, name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput);
        }

        let id = slugify(&sanitize(trimmed));
        if id.is_empty() {
            return Err(Error::InvalidInput);
        }
        if self.contains(&id) {
            return Err(Error::DuplicateGroup(id));
        }

        let mut next = self.groups.clone();
        next.push(Group::new(id.clone()));
        storage.save_groups(&next)?;
        self.groups = next;

        debug!(id = %id, count = self.groups.len(), "group created");
        Ok(id)
    }

    #[instrument(skip(self, storage))]
    pub fn select(&mut self, storage: &Storage, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::GroupNotFound(id.to_string()));
        }

        let mut next = self.groups.clone();
        for group in &mut next {
            group.selected = group.id == id;
        }
        storage.save_groups(&next)?;
        self.groups = next;

        debug!(id = %id, "group selected");
        Ok(())
    }

    /// Removes the group. When the removed group was selected, selection
    /// moves to the first remaining group in persisted order; with no
    /// groups left there is no selection and callers must handle that.
    /// Cascading task deletion is the controller's job.
    #[instrument(skip(self, storage))]
    pub fn delete(&mut self, storage: &Storage, id: &str) -> Result<()> {
        let idx = self
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| Error::GroupNotFound(id.to_string()))?;

        let mut next = self.groups.clone();
        let removed = next.remove(idx);
        if removed.selected
            && let Some(first) = next.first_mut()
        {
            first.selected = true;
        }
        storage.save_groups(&next)?;
        self.groups = next;

        debug!(id = %id, remaining = self.groups.len(), "group deleted");
        Ok(())
    }
}
