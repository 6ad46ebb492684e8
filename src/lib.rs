pub mod app;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reconcile;
pub mod stats;
pub mod state;
pub mod storage;
pub mod ticker;

pub use app::router;
pub use config::Program;
pub use state::AppState;
pub use storage::{load_data, persist_data, resolve_data_path};
