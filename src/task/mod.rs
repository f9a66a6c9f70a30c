pub mod commands;
pub mod file;
pub mod memory;
pub mod queries;

pub use file::FileTaskStore;
pub use memory::MemoryTaskStore;

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

/// Owns the task collection.
///
/// Every mutation is persisted before the call returns. Implementations
/// decide what happens when persistence fails; the HTTP layer only ever
/// sees the in-memory view.
#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Vec<Task>;

    /// Assigns a fresh identifier and appends the task.
    async fn add(&self, title: String, completed: bool) -> Task;

    /// Returns `true` if a task with `id` existed.
    async fn remove(&self, id: TaskId) -> bool;

    /// Overwrites the record stored under `id` with `task` as given,
    /// including its `id` field. Returns `true` if a record matched.
    async fn replace(&self, id: TaskId, task: Task) -> bool;
}

/// In-memory collection shared by the store implementations.
///
/// Identifiers come from a counter that only moves forward, so a deleted
/// task's id is never handed out again while the process is running.
/// Every stored id is below `next_id`; `None` means the counter ran past
/// `TaskId::MAX` and new ids are taken from the gaps instead.
#[derive(Debug)]
pub(crate) struct TaskList {
    tasks: Vec<Task>,
    next_id: Option<TaskId>,
}

impl TaskList {
    pub(crate) fn new(tasks: Vec<Task>) -> Self {
        let next_id = match tasks.iter().map(|t| t.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        Self { tasks, next_id }
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn add(&mut self, title: String, completed: bool) -> Task {
        let id = match self.next_id {
            Some(id) => {
                self.next_id = id.checked_add(1);
                id
            }
            None => self.first_unused_id(),
        };
        let task = Task {
            id,
            title,
            completed,
        };
        self.tasks.push(task.clone());
        task
    }

    fn first_unused_id(&self) -> TaskId {
        let used: HashSet<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        // there are fewer tasks than ids, so some id in range is always free
        (1..=TaskId::MAX)
            .find(|id| !used.contains(id))
            .unwrap_or(0)
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub(crate) fn replace(&mut self, id: TaskId, task: Task) -> bool {
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        // a replacement may carry a different id than the one it overwrites
        if let Some(next) = self.next_id
            && task.id >= next
        {
            self.next_id = task.id.checked_add(1);
        }
        *slot = task;
        true
    }
}
