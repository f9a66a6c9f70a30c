use axum::response::Response;
use tower_sessions::Session;

use super::AuthSession;
use super::found;

/// Destroys the session and sends the browser back to the login page.
///
/// A failure to clear the store is logged; the browser is redirected
/// either way.
pub async fn logout(session: Session, mut auth_session: AuthSession) -> Response {
    match auth_session.logout().await {
        Ok(Some(user)) => tracing::info!(username = %user.username, "logged out"),
        Ok(None) => {}
        Err(e) => tracing::error!("could not log out: {e}"),
    }

    if let Err(e) = session.flush().await {
        tracing::error!("could not destroy session: {e}");
    }

    found("/login")
}
