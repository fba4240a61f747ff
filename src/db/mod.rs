use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use crate::models::*;
use crate::query::{Pagination, PlayerFilter};

/// Open the pool, creating the database file if it does not exist yet.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS players (
               id TEXT PRIMARY KEY NOT NULL,
               name TEXT NOT NULL,
               name_folded TEXT NOT NULL,
               nickname TEXT,
               nickname_folded TEXT,
               creation_date TEXT NOT NULL,
               strength REAL,
               speed REAL,
               drible REAL,
               created_at TEXT NOT NULL,
               updated_at TEXT NOT NULL
           )"#
    )
    .execute(pool)
    .await?;

    Ok(())
}

// Appends a WHERE clause for every criterion in the filter.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &PlayerFilter) {
    let mut separator = " WHERE ";

    for substring in &filter.substrings {
        builder.push(separator);
        if substring.case_sensitive {
            builder
                .push(format!("instr({}, ", substring.field.column()))
                .push_bind(substring.substring.clone());
        } else {
            // SQLite lower() folds ASCII only, so compare against columns folded in Rust
            builder
                .push(format!("instr({}, ", substring.field.folded_column()))
                .push_bind(fold(&substring.substring));
        }
        builder.push(") > 0");
        separator = " AND ";
    }

    if let Some(id) = &filter.id {
        builder.push(separator).push("id = ").push_bind(id.clone());
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

// Player queries
pub async fn count_players(pool: &SqlitePool, filter: &PlayerFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM players");
    push_filter(&mut builder, filter);

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Filtered page of players, in insertion order.
pub async fn find_players(
    pool: &SqlitePool,
    filter: &PlayerFilter,
    pagination: Pagination,
) -> Result<Vec<PlayerSummary>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT id, name, nickname, creation_date FROM players");
    push_filter(&mut builder, filter);
    builder
        .push(" ORDER BY rowid LIMIT ")
        .push_bind(pagination.sql_limit())
        .push(" OFFSET ")
        .push_bind(pagination.skip());

    builder.build_query_as::<PlayerSummary>().fetch_all(pool).await
}

pub async fn get_all_players(pool: &SqlitePool) -> Result<Vec<Player>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PlayerRow>(
        r#"SELECT * FROM players ORDER BY rowid"#
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PlayerRow::into_player).collect())
}

pub async fn get_player_by_id(pool: &SqlitePool, player_id: &str) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerRow>(
        r#"SELECT * FROM players WHERE id = ?"#
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(PlayerRow::into_player))
}

pub async fn insert_player(pool: &SqlitePool, player: &Player) -> Result<(), sqlx::Error> {
    let skills = player.skills.clone().unwrap_or_default();

    sqlx::query(
        r#"INSERT INTO players
               (id, name, name_folded, nickname, nickname_folded, creation_date,
                strength, speed, drible, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
    )
    .bind(&player.id)
    .bind(&player.name)
    .bind(fold(&player.name))
    .bind(&player.nickname)
    .bind(player.nickname.as_deref().map(fold))
    .bind(player.creation_date)
    .bind(skills.strength)
    .bind(skills.speed)
    .bind(skills.drible)
    .bind(player.created_at)
    .bind(player.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply a partial update and return the stored result, or `None` if no player has this id.
pub async fn update_player(
    pool: &SqlitePool,
    player_id: &str,
    patch: PlayerUpdate,
) -> Result<Option<Player>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(row) = sqlx::query_as::<_, PlayerRow>(
        r#"SELECT * FROM players WHERE id = ?"#
    )
    .bind(player_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    let mut player = row.into_player();
    player.apply(patch, Utc::now());
    let skills = player.skills.clone().unwrap_or_default();

    sqlx::query(
        r#"UPDATE players
           SET name = ?, name_folded = ?, nickname = ?, nickname_folded = ?,
               strength = ?, speed = ?, drible = ?, updated_at = ?
           WHERE id = ?"#
    )
    .bind(&player.name)
    .bind(fold(&player.name))
    .bind(&player.nickname)
    .bind(player.nickname.as_deref().map(fold))
    .bind(skills.strength)
    .bind(skills.speed)
    .bind(skills.drible)
    .bind(player.updated_at)
    .bind(&player.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(player))
}

/// Remove a player and return what was deleted.
pub async fn delete_player(pool: &SqlitePool, player_id: &str) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerRow>(
        r#"DELETE FROM players WHERE id = ? RETURNING *"#
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(PlayerRow::into_player))
}
