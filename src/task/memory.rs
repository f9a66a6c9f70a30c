use std::sync::Mutex;

use super::Task;
use super::TaskId;
use super::TaskList;
use super::TaskStore;

/// Task store with no backing file.
pub struct MemoryTaskStore {
    list: Mutex<TaskList>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            list: Mutex::new(TaskList::new(tasks)),
        }
    }

    fn with_list<R>(&self, f: impl FnOnce(&mut TaskList) -> R) -> R {
        // a poisoned lock still holds a consistent list, every mutation is a single step
        let mut list = self
            .list
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *list)
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self) -> Vec<Task> {
        self.with_list(|list| list.tasks().to_vec())
    }

    async fn add(&self, title: String, completed: bool) -> Task {
        self.with_list(|list| list.add(title, completed))
    }

    async fn remove(&self, id: TaskId) -> bool {
        self.with_list(|list| list.remove(id))
    }

    async fn replace(&self, id: TaskId, task: Task) -> bool {
        self.with_list(|list| list.replace(id, task))
    }
}
