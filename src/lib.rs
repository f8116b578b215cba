// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod duration_input;
pub mod error;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod setup;
pub mod tick;
pub mod timer;
pub mod ui;
