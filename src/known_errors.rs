use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use crate::auth::Backend;
use crate::theme::notice;

#[derive(Error, Debug)]
pub enum KnownErrors {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("password check failed: {0}")]
    CredentialCheck(#[from] tokio::task::JoinError),
}

// The login layer wraps backend errors, and the backend error is this type.
impl From<axum_login::Error<Backend>> for KnownErrors {
    fn from(e: axum_login::Error<Backend>) -> Self {
        match e {
            axum_login::Error::Session(e) => KnownErrors::Session(e),
            axum_login::Error::Backend(e) => e,
        }
    }
}

impl IntoResponse for KnownErrors {
    fn into_response(self) -> Response {
        tracing::error!("{self}");
        let message = match self {
            KnownErrors::Session(_) => "Your session could not be loaded. Please try again.",
            KnownErrors::CredentialCheck(_) => "Your login could not be checked. Please try again.",
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            notice("Something went wrong", message),
        )
            .into_response()
    }
}
