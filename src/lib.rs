//! CRUD HTTP API for a single `movies` table backed by SQLite.

use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

/// Build the application router over an already-initialised pool.
pub fn app(pool: SqlitePool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Root and health
        .route("/", get(|| async { "Movie API - v1.0" }))
        .route("/health", get(routes::health::health_check))

        // Movie endpoints
        .route(
            "/movies",
            get(routes::movies::get_movies).post(routes::movies::create_movie),
        )
        .route(
            "/movies/{id}",
            get(routes::movies::get_movie)
                .put(routes::movies::update_movie)
                .delete(routes::movies::delete_movie),
        )

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}
