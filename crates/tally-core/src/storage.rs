use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::task::{Group, Task};

/// Persistence gateway for the two collections. Every save is a whole
/// collection overwrite; reads never fail (missing or malformed files
/// degrade to an empty collection).
#[derive(Debug)]
pub struct Storage {
    pub data_dir: PathBuf,
    pub groups_path: PathBuf,
    pub tasks_path: PathBuf,
}

impl Storage {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let groups_path = data_dir.join("groups.data");
        let tasks_path = data_dir.join("tasks.data");

        if !groups_path.exists() {
            fs::write(&groups_path, "")?;
        }
        if !tasks_path.exists() {
            fs::write(&tasks_path, "")?;
        }

        info!(
            data_dir = %data_dir.display(),
            groups = %groups_path.display(),
            tasks = %tasks_path.display(),
            "opened storage"
        );

        Ok(Self {
            data_dir,
            groups_path,
            tasks_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_groups(&self) -> Vec<Group> {
        load_jsonl(&self.groups_path)
    }

    #[tracing::instrument(skip(self))]
    pub fn load_tasks(&self) -> Vec<Task> {
        load_jsonl(&self.tasks_path)
    }

    #[tracing::instrument(skip(self, groups))]
    pub fn save_groups(&self, groups: &[Group]) -> Result<()> {
        save_jsonl_atomic(&self.groups_path, groups)
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        save_jsonl_atomic(&self.tasks_path, tasks)
    }
}

fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    debug!(file = %path.display(), "loading jsonl");
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!(file = %path.display(), error = %err, "no data file, starting empty");
            return Vec::new();
        }
    };
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "unreadable data file, treating as empty");
                return Vec::new();
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str(trimmed) {
            Ok(value) => out.push(value),
            Err(err) => {
                warn!(
                    file = %path.display(),
                    line = idx + 1,
                    error = %err,
                    "malformed data file, treating as empty"
                );
                return Vec::new();
            }
        }
    }

    debug!(count = out.len(), "loaded records from jsonl");
    out
}

fn save_jsonl_atomic<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    debug!(file = %path.display(), count = items.len(), "saving jsonl atomically");
    write_jsonl(path, items).map_err(|source| Error::Storage {
        path: path.to_path_buf(),
        source,
    })
}

fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for item in items {
        let serialized = serde_json::to_string(item)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
