pub mod credentials;
pub mod login;
pub mod logout;

pub use credentials::CredentialProvider;
pub use credentials::StaticCredentials;
pub use credentials::UserCredential;
pub use credentials::UserId;
pub use credentials::authenticate;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_login::AuthnBackend;

use crate::known_errors::KnownErrors;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Login backend over an injected user table.
///
/// The session keeps the user id and the password hash; a session whose
/// user is gone, or whose hash no longer matches, is treated as logged out.
#[derive(Clone)]
pub struct Backend {
    credentials: Arc<dyn CredentialProvider>,
}

impl Backend {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { credentials }
    }
}

#[async_trait::async_trait]
impl AuthnBackend for Backend {
    type User = UserCredential;
    type Credentials = Credentials;
    type Error = KnownErrors;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        authenticate(self.credentials.as_ref(), &creds.username, &creds.password).await
    }

    async fn get_user(
        &self,
        user_id: &axum_login::UserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        Ok(self.credentials.find_by_id(*user_id).await)
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

/// `302 Found`, the status the login flow expects.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
