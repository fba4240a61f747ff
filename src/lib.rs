//! Football player management API: CRUD over player records plus skill
//! ranking and team division.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::sqlite::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod ranking;
pub mod routes;

/// Full HTTP application over an open pool.
pub fn app(pool: SqlitePool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Root and health
        .route("/", get(|| async { "Server is on!" }))
        .route("/health", get(routes::health::health_check))

        // Player endpoints
        .route(
            "/api/players",
            get(routes::players::get_players).post(routes::players::create_player),
        )
        .route("/api/players/rank", get(routes::players::rank_players))
        .route("/api/players/divide-teams", post(routes::players::divide_teams))
        .route(
            "/api/players/{id}",
            get(routes::players::get_player_by_id)
                .put(routes::players::update_player)
                .delete(routes::players::delete_player),
        )

        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(pool)
}
