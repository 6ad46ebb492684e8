use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/records", get(handlers::list_records))
        .route("/api/records/:date", patch(handlers::edit_record))
        .route("/api/today", get(handlers::get_today))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/photos/:index", put(handlers::put_photo))
        .route("/api/measurements/:key", put(handlers::put_measurement))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
