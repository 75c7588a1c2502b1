pub mod app;
pub mod backup;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod summary;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{resolve_data_dir, Storage};
pub use store::Store;
