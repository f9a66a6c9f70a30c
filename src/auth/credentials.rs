use std::fmt;

use axum_login::AuthUser;
use tokio::task;

use crate::known_errors::KnownErrors;

pub type UserId = u32;

#[derive(Clone)]
pub struct UserCredential {
    pub id: UserId,
    pub username: String,
    password_hash: String,
}

impl UserCredential {
    pub fn new(id: UserId, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

impl AuthUser for UserCredential {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.password_hash.as_bytes()
    }
}

/// Source of the users allowed to log in.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn find(&self, username: &str) -> Option<UserCredential>;

    async fn find_by_id(&self, id: UserId) -> Option<UserCredential>;
}

/// A fixed user table, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    users: Vec<UserCredential>,
}

impl StaticCredentials {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }

    /// The accounts compiled into the server.
    pub fn builtin() -> Self {
        Self::new(vec![
            UserCredential::new(
                1,
                "wea",
                "$2a$12$nClo3i0tEfqCjfxWJJLGEuebJNF97eVS8JxErCE4VLrBv9BY/Xh5S",
            ),
            UserCredential::new(
                2,
                "admin",
                "$2a$12$pf5LfVonwFZpVIjz5tzEmutcIt.mzob7e1gsIt7yHWCYrU8WP5OUa",
            ),
        ])
    }
}

#[async_trait::async_trait]
impl CredentialProvider for StaticCredentials {
    async fn find(&self, username: &str) -> Option<UserCredential> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    async fn find_by_id(&self, id: UserId) -> Option<UserCredential> {
        self.users.iter().find(|u| u.id == id).cloned()
    }
}

/// Checks `password` against the stored bcrypt hash for `username` and
/// returns the matching user.
///
/// Unknown users and wrong passwords both come back `Ok(None)`. An error
/// means the check itself could not run.
pub async fn authenticate(
    provider: &dyn CredentialProvider,
    username: &str,
    password: &str,
) -> Result<Option<UserCredential>, KnownErrors> {
    let Some(user) = provider.find(username).await else {
        return Ok(None);
    };

    let password = password.to_string();
    task::spawn_blocking(move || {
        if bcrypt::verify(password, user.password_hash()).is_ok_and(|ok| ok) {
            Some(user)
        } else {
            None
        }
    })
    .await
    .map_err(KnownErrors::from)
}
