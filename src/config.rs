use std::path::PathBuf;

use clap::Parser;

/// Command line and environment settings for the server.
#[derive(Parser, Debug, Clone)]
#[command(name = "taskboard", about = "Single-user task list server")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SITE_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// JSON file the task list is persisted to
    #[arg(long, env = "TASKS_FILE", default_value = "tasks.json")]
    pub tasks_file: PathBuf,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "SECURE_COOKIES")]
    pub secure_cookies: bool,
}
