use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use validator::Validate;

use crate::db;
use crate::error::ApiError;
use crate::models::{
    DivideTeamsRequest, MessageResponse, NewPlayer, Player, PlayerPage, PlayerUpdate,
    TeamsResponse,
};
use crate::query::{ensure_min_population, ListPlayersQuery, PlayerQuery};
use crate::ranking;

// GET /api/players?page=1&limit=10&name=ron - Filtered, paginated listing
pub async fn get_players(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListPlayersQuery>,
) -> Result<Json<PlayerPage>, ApiError> {
    let PlayerQuery { filter, pagination } = params.build()?;

    let total = db::count_players(&pool, &filter).await?;
    ensure_min_population(total)?;

    let players = db::find_players(&pool, &filter, pagination).await?;

    Ok(Json(PlayerPage {
        total,
        page: pagination.page,
        limit: pagination.limit,
        players,
    }))
}

// GET /api/players/:id - Get player by ID
pub async fn get_player_by_id(
    State(pool): State<SqlitePool>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let player = db::get_player_by_id(&pool, &player_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(player))
}

// POST /api/players - Create a player
pub async fn create_player(
    State(pool): State<SqlitePool>,
    payload: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let Json(new_player) = payload?;
    let player = new_player.into_player(uuid::Uuid::new_v4().to_string(), chrono::Utc::now())?;

    db::insert_player(&pool, &player).await?;
    tracing::info!("Created player {} ({})", player.id, player.name);

    Ok((StatusCode::CREATED, Json(player)))
}

// PUT /api/players/:id - Partially update a player
pub async fn update_player(
    State(pool): State<SqlitePool>,
    Path(player_id): Path<String>,
    payload: Result<Json<PlayerUpdate>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(patch) = payload?;
    patch.validate()?;

    let player = db::update_player(&pool, &player_id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!("Updated player {}", player.id);

    Ok(Json(player))
}

// DELETE /api/players/:id - Delete a player
pub async fn delete_player(
    State(pool): State<SqlitePool>,
    Path(player_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let player = db::delete_player(&pool, &player_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!("Deleted player {}", player.id);

    Ok(Json(MessageResponse {
        message: "Player deleted successfully".to_string(),
    }))
}

// GET /api/players/rank - All players ordered by skill score
pub async fn rank_players(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let players = db::get_all_players(&pool).await?;

    Ok(Json(ranking::rank_players(players)))
}

// POST /api/players/divide-teams - Split the ranking into teams of playersPerTeam
pub async fn divide_teams(
    State(pool): State<SqlitePool>,
    payload: Result<Json<DivideTeamsRequest>, JsonRejection>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let Json(request) = payload?;
    let players_per_team = ranking::parse_players_per_team(request.players_per_team.as_ref())?;

    let players = db::get_all_players(&pool).await?;
    let teams = ranking::divide_teams(players, players_per_team)?;
    tracing::debug!("Divided players into {} teams of {}", teams.len(), players_per_team);

    Ok(Json(TeamsResponse { teams }))
}
