use std::env;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;

use taskboard::app::app;
use taskboard::appstate::AppState;
use taskboard::config::Config;
use taskboard::task::FileTaskStore;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        unsafe {
            // Concurrent writing of set_var is not permitted,
            // but we're in main, so that shouldn't be a problem.
            env::set_var("RUST_LOG", "INFO");
        }
    }
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let task_store = FileTaskStore::open(&config.tasks_file);
    let state = AppState::with_builtin_users(Arc::new(task_store));

    let app = app(state, config.secure_cookies);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("listening on http://{}", config.addr);
    axum::serve(listener, app.into_make_service()).await
}
