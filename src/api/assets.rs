//! Static front-end hosting

use std::path::Path;

use axum::{routing::get_service, Router};
use tower_http::services::{ServeDir, ServeFile};

/// Serve files under `dir`, with `/` answered by `dir/index.html`.
/// Paths outside the directory's contents get a 404.
pub fn router(dir: &Path) -> Router {
    let index = ServeFile::new(dir.join("index.html"));

    Router::new()
        .route("/", get_service(index))
        .fallback_service(ServeDir::new(dir))
}
