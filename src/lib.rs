pub mod apis;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod models;
pub mod secrets;
pub mod store;
mod ui;

// Re-export the pieces the binary and integration tests use directly
pub use app::state::App;
pub use app::state::AppState;
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use store::Store;
pub use ui::run_app;
