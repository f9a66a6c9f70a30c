use axum::Router;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::put;
use axum_login::AuthManagerLayerBuilder;
use axum_login::login_required;
use maud::Markup;
use maud::html;
use tower_http::trace::TraceLayer;
use tower_sessions::MemoryStore;
use tower_sessions::SessionManagerLayer;

use crate::appstate::AppState;
use crate::auth;
use crate::auth::AuthSession;
use crate::auth::Backend;
use crate::notfoundpage::not_found_page;
use crate::task::commands;
use crate::task::queries;
use crate::theme::theme_with_head;

/// Builds the full application router over `state`.
///
/// Sessions live in process memory and are lost on restart. Only `/` sits
/// behind the login guard; the task API and `/logout` are reachable without
/// a session.
pub fn app(state: AppState, secure_cookies: bool) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(secure_cookies);
    let auth_layer =
        AuthManagerLayerBuilder::new(Backend::new(state.credentials.clone()), session_layer)
            .build();

    let protected = Router::new()
        .route("/", get(homepage))
        .route_layer(login_required!(Backend, login_url = "/login"));

    Router::new()
        .route(
            "/login",
            get(auth::login::login_get).post(auth::login::login_post),
        )
        .route("/logout", get(auth::logout::logout))
        .route("/script.js", get(serve_script))
        .route("/styles.css", get(serve_styles))
        .route(
            "/tasks",
            get(queries::list_tasks).post(commands::create_task),
        )
        .route(
            "/tasks/{id}",
            put(commands::update_task).delete(commands::delete_task),
        )
        .merge(protected)
        .fallback(not_found_page)
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn homepage(auth_session: AuthSession) -> Markup {
    let username = auth_session
        .user
        .map(|user| user.username)
        .unwrap_or_default();

    theme_with_head(
        Some("My Tasks"),
        html! {
            script src="/script.js" defer {}
        },
        html! {
            header {
                h1 { "My Tasks" }
                p class="greeting" { "Signed in as " strong { (username) } }
                button type="button" onclick="logout()" { "Log out" }
            }

            form id="task-form" {
                input type="text" id="task-input" placeholder="What needs doing?" autocomplete="off";
                button type="submit" { "Add" }
            }

            div class="filters" {
                button type="button" onclick="filterTasks('all')" { "All" }
                button type="button" onclick="filterTasks('completed')" { "Completed" }
                button type="button" onclick="filterTasks('uncompleted')" { "Uncompleted" }
            }

            div id="tasks-container" {}
        },
    )
}

async fn serve_script() -> impl IntoResponse {
    const SCRIPT: &str = include_str!("script.js");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT,
    )
}

async fn serve_styles() -> impl IntoResponse {
    const STYLES: &str = include_str!("styles.css");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use crate::auth::UserCredential;
    use crate::task::MemoryTaskStore;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::Response;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let hash = bcrypt::hash("hunter2", 4).expect("should hash test password");
        let state = AppState::new(
            Arc::new(MemoryTaskStore::new()),
            Arc::new(StaticCredentials::new(vec![UserCredential::new(1, "alice", hash)])),
        );
        app(state, false)
    }

    async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
        app.clone()
            .oneshot(request)
            .await
            .expect("router should not fail")
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
    }

    async fn get_tasks(app: &Router) -> Value {
        let response = send(
            app,
            Request::builder()
                .uri("/tasks")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_str(&body_text(response).await).expect("tasks should be JSON")
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .expect("request should build")
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).expect("request should build")
    }

    fn session_cookie(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    fn location(response: &Response<Body>) -> Option<&str> {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    fn assert_sent_to_login(response: &Response<Body>) {
        assert!(response.status().is_redirection());
        assert!(
            location(response).is_some_and(|l| l.starts_with("/login")),
            "guard should redirect to the login page"
        );
    }

    fn task_ids(tasks: &Value) -> Vec<u64> {
        tasks
            .as_array()
            .expect("tasks should be an array")
            .iter()
            .filter_map(|t| t["id"].as_u64())
            .collect()
    }

    fn error_paths(errors: &Value) -> Vec<&str> {
        errors["errors"]
            .as_array()
            .expect("errors should be an array")
            .iter()
            .filter_map(|e| e["path"].as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_task_lifecycle_scenario() {
        let app = test_app();
        assert_eq!(get_tasks(&app).await, json!([]));

        let response = send(
            &app,
            json_request("POST", "/tasks", json!({ "title": "buy milk", "completed": false })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_text(response).await, "Task added successfully");
        assert_eq!(
            get_tasks(&app).await,
            json!([{ "id": 1, "title": "buy milk", "completed": false }])
        );

        let response = send(
            &app,
            json_request(
                "PUT",
                "/tasks/1",
                json!({ "id": 1, "title": "buy milk", "completed": true }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Task updated successfully");
        assert_eq!(
            get_tasks(&app).await,
            json!([{ "id": 1, "title": "buy milk", "completed": true }])
        );

        let response = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/tasks/1")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Task deleted successfully");
        assert_eq!(get_tasks(&app).await, json!([]));
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_id() {
        let app = test_app();
        for title in ["a", "b", "c"] {
            send(
                &app,
                json_request("POST", "/tasks", json!({ "title": title, "completed": false })),
            )
            .await;
        }

        send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/tasks/2")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await;

        assert_eq!(task_ids(&get_tasks(&app).await), vec![1, 3]);

        // a new task after a delete must not collide with a live id
        send(
            &app,
            json_request("POST", "/tasks", json!({ "title": "d", "completed": false })),
        )
        .await;
        assert_eq!(get_tasks(&app).await[2]["id"], 4);
    }

    #[tokio::test]
    async fn test_create_task_validation() {
        let app = test_app();

        let response = send(
            &app,
            json_request("POST", "/tasks", json!({ "title": 5, "completed": "no" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let errors: Value =
            serde_json::from_str(&body_text(response).await).expect("errors should be JSON");
        assert_eq!(error_paths(&errors), vec!["title", "completed"]);

        assert_eq!(get_tasks(&app).await, json!([]));
    }

    #[tokio::test]
    async fn test_unreadable_create_body_gets_field_errors() {
        let app = test_app();

        let requests = [
            Request::builder()
                .method("POST")
                .uri("/tasks")
                .body(Body::from(r#"{"title":"a","completed":false}"#))
                .expect("request should build"),
            Request::builder()
                .method("POST")
                .uri("/tasks")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::empty())
                .expect("request should build"),
            Request::builder()
                .method("POST")
                .uri("/tasks")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("request should build"),
        ];

        for request in requests {
            let response = send(&app, request).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let errors: Value =
                serde_json::from_str(&body_text(response).await).expect("errors should be JSON");
            assert_eq!(error_paths(&errors), vec!["title", "completed"]);
            for error in errors["errors"].as_array().expect("errors should be an array") {
                assert!(error.get("value").is_none());
            }
        }

        assert_eq!(get_tasks(&app).await, json!([]));
    }

    #[tokio::test]
    async fn test_put_max_id_then_create_keeps_ids_unique() {
        let app = test_app();
        send(
            &app,
            json_request("POST", "/tasks", json!({ "title": "a", "completed": false })),
        )
        .await;

        let response = send(
            &app,
            json_request(
                "PUT",
                "/tasks/1",
                json!({ "id": u64::MAX, "title": "a", "completed": false }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        for title in ["b", "c"] {
            let response = send(
                &app,
                json_request("POST", "/tasks", json!({ "title": title, "completed": false })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let mut ids = task_ids(&get_tasks(&app).await);
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&u64::MAX));
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_put_body_shape() {
        let app = test_app();
        send(
            &app,
            json_request("POST", "/tasks", json!({ "title": "a", "completed": false })),
        )
        .await;

        // unknown fields are dropped, not stored
        let response = send(
            &app,
            json_request(
                "PUT",
                "/tasks/1",
                json!({ "id": 1, "title": "b", "completed": true, "color": "red" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_tasks(&app).await,
            json!([{ "id": 1, "title": "b", "completed": true }])
        );

        // a partial body is refused and changes nothing
        let response = send(
            &app,
            json_request("PUT", "/tasks/1", json!({ "completed": false })),
        )
        .await;
        assert!(response.status().is_client_error());
        assert_eq!(
            get_tasks(&app).await,
            json!([{ "id": 1, "title": "b", "completed": true }])
        );
    }

    #[tokio::test]
    async fn test_put_unknown_id_changes_nothing() {
        let app = test_app();
        send(
            &app,
            json_request("POST", "/tasks", json!({ "title": "a", "completed": false })),
        )
        .await;

        let response = send(
            &app,
            json_request(
                "PUT",
                "/tasks/9",
                json!({ "id": 9, "title": "ghost", "completed": true }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_tasks(&app).await,
            json!([{ "id": 1, "title": "a", "completed": false }])
        );
    }

    #[tokio::test]
    async fn test_home_requires_login() {
        let app = test_app();

        let response = send(&app, get_with_cookie("/", None)).await;
        assert_sent_to_login(&response);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let app = test_app();

        let response = send(&app, login_request("alice", "hunter2")).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/"));
        let cookie = session_cookie(&response).expect("login should set a session cookie");

        let response = send(&app, get_with_cookie("/", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("tasks-container"));
        assert!(page.contains("alice"));

        let response = send(&app, get_with_cookie("/logout", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/login"));

        let response = send(&app, get_with_cookie("/", Some(&cookie))).await;
        assert_sent_to_login(&response);
    }

    #[tokio::test]
    async fn test_bad_login_does_not_authenticate() {
        let app = test_app();

        for (username, password) in [("alice", "wrong"), ("mallory", "hunter2")] {
            let response = send(&app, login_request(username, password)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let cookie = session_cookie(&response);
            let page = body_text(response).await;
            assert!(page.contains("Invalid username or password"));

            let response = send(&app, get_with_cookie("/", cookie.as_deref())).await;
            assert_sent_to_login(&response);
        }
    }

    #[tokio::test]
    async fn test_login_page_and_assets() {
        let app = test_app();

        let response = send(&app, get_with_cookie("/login", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("action=\"/login\""));

        let response = send(&app, get_with_cookie("/script.js", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&header::HeaderValue::from_static(
                "text/javascript; charset=utf-8"
            ))
        );
        assert!(body_text(response).await.contains("function fetchTasks"));

        let response = send(&app, get_with_cookie("/styles.css", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app();

        let response = send(&app, get_with_cookie("/nope", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page Not Found"));
    }
}
