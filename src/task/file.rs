use std::io;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::Mutex;

use super::Task;
use super::TaskId;
use super::TaskList;
use super::TaskStore;

#[derive(Error, Debug)]
pub enum TaskFileError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is not a JSON array of tasks: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Task store mirrored to a single JSON file.
///
/// The whole collection is rewritten after every mutation. A failed write is
/// logged and the in-memory state is kept, so memory and disk can drift
/// apart until the next successful write.
pub struct FileTaskStore {
    path: PathBuf,
    list: Mutex<TaskList>,
}

impl FileTaskStore {
    /// Loads the collection from `path`. A missing or unreadable file starts
    /// the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = match load_tasks(&path) {
            Ok(tasks) => {
                tracing::info!(path = %path.display(), count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(TaskFileError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no task file yet, starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("{e}, starting with no tasks");
                Vec::new()
            }
        };

        Self {
            path,
            list: Mutex::new(TaskList::new(tasks)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tasks: &[Task]) {
        if let Err(e) = save_tasks(&self.path, tasks).await {
            tracing::error!("error saving tasks: {e}");
        }
    }
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, TaskFileError> {
    let data = std::fs::read(path).map_err(|source| TaskFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| TaskFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the collection next to `path` and renames it into place.
pub async fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), TaskFileError> {
    let json = serde_json::to_string_pretty(tasks)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let write_err = |source| TaskFileError::Write {
        path: path.to_path_buf(),
        source,
    };

    tokio::fs::write(&tmp, json).await.map_err(write_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(write_err)?;

    Ok(())
}

#[async_trait::async_trait]
impl TaskStore for FileTaskStore {
    async fn list(&self) -> Vec<Task> {
        self.list.lock().await.tasks().to_vec()
    }

    async fn add(&self, title: String, completed: bool) -> Task {
        let mut list = self.list.lock().await;
        let task = list.add(title, completed);
        self.persist(list.tasks()).await;
        task
    }

    async fn remove(&self, id: TaskId) -> bool {
        let mut list = self.list.lock().await;
        let removed = list.remove(id);
        self.persist(list.tasks()).await;
        removed
    }

    async fn replace(&self, id: TaskId, task: Task) -> bool {
        let mut list = self.list.lock().await;
        let replaced = list.replace(id, task);
        self.persist(list.tasks()).await;
        replaced
    }
}
