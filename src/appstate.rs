use std::sync::Arc;

use crate::auth::CredentialProvider;
use crate::auth::StaticCredentials;
use crate::task::TaskStore;

/// Everything the handlers need, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub task_store: Arc<dyn TaskStore>,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl AppState {
    pub fn new(task_store: Arc<dyn TaskStore>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            task_store,
            credentials,
        }
    }

    /// State backed by `task_store` and the built-in user table.
    pub fn with_builtin_users(task_store: Arc<dyn TaskStore>) -> Self {
        Self::new(task_store, Arc::new(StaticCredentials::builtin()))
    }
}
