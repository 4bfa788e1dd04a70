use std::io;
use std::path::PathBuf;

use uuid::Uuid;

/// Recoverable store errors. Every variant is a declined operation, not a
/// process failure; the in-memory collections are unchanged when one is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input is empty or whitespace-only")]
    InvalidInput,

    #[error("no task with id {0}")]
    TaskNotFound(Uuid),

    #[error("no group with id '{0}'")]
    GroupNotFound(String),

    #[error("group '{0}' already exists")]
    DuplicateGroup(String),

    #[error("no group is selected")]
    NoGroupSelected,

    #[error("failed to write {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
