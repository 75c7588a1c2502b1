use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/periods", get(handlers::get_periods))
        .route("/api/state", get(handlers::get_state))
        .route(
            "/api/day/:date",
            get(handlers::get_day)
                .put(handlers::put_day)
                .delete(handlers::delete_day),
        )
        .route(
            "/api/goal/:index",
            get(handlers::get_goal).put(handlers::put_goal),
        )
        .route("/api/summary/:index", get(handlers::get_summary))
        .route("/api/tags", put(handlers::put_tags))
        .route("/api/view", put(handlers::put_view))
        .route("/api/backup", get(handlers::get_backup))
        .route("/api/backup/restore", post(handlers::restore_backup))
        .route("/api/backup/auto", get(handlers::get_auto_backups))
        .with_state(state)
}
