//! HTTP API server

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod assets;
pub mod handlers;
pub mod state;

pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    let assets = assets::router(&state.assets_dir);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/db", get(handlers::db_check))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/:id",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .with_state(state)
        .merge(assets)
        .layer(TraceLayer::new_for_http())
}
