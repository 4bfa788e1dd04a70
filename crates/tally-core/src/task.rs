use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Group every freshly bootstrapped store starts with.
pub const SEED_GROUP_ID: &str = "reminders";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: String,

    #[serde(default)]
    pub selected: bool,
}

impl Group {
    pub fn new(id: String) -> Self {
        Self {
            id,
            selected: false,
        }
    }

    pub fn seed() -> Self {
        Self {
            id: SEED_GROUP_ID.to_string(),
            selected: true,
        }
    }
}

/// A single todo entry. `id` is minted once at creation and is the only
/// handle mutations accept; titles are display text, not identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub completed: bool,

    pub group_id: String,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl Task {
    pub fn new(title: String, group_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            completed: false,
            group_id,
            created: now,
        }
    }
}
