pub mod aggregate;
pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod streak;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{load_records, persist_records};
pub use store::HabitStore;
