pub mod app;
pub mod appstate;
pub mod auth;
pub mod config;
pub mod known_errors;
pub mod notfoundpage;
pub mod task;
pub mod theme;
