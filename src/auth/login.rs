use axum::Form;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use maud::Markup;
use maud::html;
use serde::Deserialize;

use super::AuthSession;
use super::Credentials;
use super::found;
use crate::known_errors::KnownErrors;
use crate::theme::notice;
use crate::theme::theme_with_head;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

fn login_page() -> Markup {
    theme_with_head(
        Some("Login"),
        html! {},
        html! {
            div class="login-container" {
                h1 { "Login" }
                form id="login-form" method="POST" action="/login" {
                    label for="username" { "Username" }
                    input type="text" id="username" name="username" autocomplete="username" required;

                    label for="password" { "Password" }
                    input type="password" id="password" name="password" autocomplete="current-password" required;

                    button type="submit" { "Log in" }
                }
            }
        },
    )
}

pub async fn login_get() -> Markup {
    login_page()
}

/// Checks the submitted credentials and, on success, starts a fresh
/// session for the user and sends them to `/`.
pub async fn login_post(
    mut auth_session: AuthSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, KnownErrors> {
    let user = auth_session
        .authenticate(Credentials {
            username: form.username.clone(),
            password: form.password,
        })
        .await?;

    let Some(user) = user else {
        tracing::warn!(username = %form.username, "login failed");
        return Ok((
            StatusCode::UNAUTHORIZED,
            notice(
                "Invalid username or password",
                "Please check your credentials and try again.",
            ),
        )
            .into_response());
    };

    auth_session.login(&user).await?;

    tracing::info!(username = %user.username, "logged in");
    Ok(found("/"))
}
