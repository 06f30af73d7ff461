use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::form_add_habit))
        .route("/habits/:index/delete", post(handlers::form_delete_habit))
        .route("/days/:date/habits/:index/toggle", post(handlers::form_toggle_habit))
        .route("/days/:date/tasks", post(handlers::form_add_task))
        .route("/days/:date/tasks/:index/toggle", post(handlers::form_toggle_task))
        .route("/days/:date/tasks/:index/delete", post(handlers::form_delete_task))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/days/:date", get(handlers::get_day))
        .route("/api/months/:date", get(handlers::get_month))
        .route("/api/habits", post(handlers::add_habit))
        .route("/api/habits/:index", delete(handlers::delete_habit))
        .route("/api/days/:date/habits/:index/toggle", post(handlers::toggle_habit))
        .route("/api/days/:date/tasks", post(handlers::add_task))
        .route("/api/days/:date/tasks/:index/toggle", post(handlers::toggle_task))
        .route("/api/days/:date/tasks/:index", delete(handlers::delete_task))
        .with_state(state)
}
