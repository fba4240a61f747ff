use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: String,
    timestamp: i64,
}

// GET /health - Liveness plus a round trip to the player store
pub async fn health_check(State(pool): State<SqlitePool>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (StatusCode::OK, "up"),
        Err(e) => {
            tracing::error!("Health check could not reach the database: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "down")
        }
    };

    let response = HealthResponse {
        status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    (status, Json(response))
}
