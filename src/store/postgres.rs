use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

use super::{GameStore, PlayerRecord};
use crate::shared::AppError;

/// PostgreSQL implementation of GameStore for production.
///
/// Expected schema:
///   games(room_id TEXT PRIMARY KEY, theme TEXT, status TEXT,
///         started_at TIMESTAMPTZ)
///   players(id TEXT PRIMARY KEY, name TEXT, role TEXT,
///           room_id TEXT REFERENCES games(room_id))
pub struct PostgresGameStore {
    pool: PgPool,
}

impl PostgresGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStore for PostgresGameStore {
    #[instrument(skip(self))]
    async fn create_game(&self, room_id: &str) -> Result<(), AppError> {
        debug!(room_id = %room_id, "Creating game record in database");

        sqlx::query(
            "INSERT INTO games (room_id, theme, status, started_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(room_id)
        .bind("Default")
        .bind("drawing")
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to create game record");
            AppError::Store(e.to_string())
        })?;

        debug!(room_id = %room_id, "Game record created in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_player(&self, name: &str, room_id: &str) -> Result<String, AppError> {
        debug!(room_id = %room_id, name = %name, "Creating player record in database");

        let record = PlayerRecord::new(name.to_string(), room_id.to_string());

        sqlx::query("INSERT INTO players (id, name, role, room_id) VALUES ($1, $2, $3, $4)")
            .bind(&record.id)
            .bind(&record.name)
            .bind(&record.role)
            .bind(&record.room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to create player record");
                AppError::Store(e.to_string())
            })?;

        debug!(room_id = %room_id, player_id = %record.id, "Player record created in database");
        Ok(record.id)
    }

    #[instrument(skip(self))]
    async fn count_members(&self, room_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM players WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to count players");
                AppError::Store(e.to_string())
            })?;

        Ok(row.get("count"))
    }

    #[instrument(skip(self))]
    async fn game_exists(&self, room_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM games WHERE room_id = $1) AS present")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to check game existence");
                AppError::Store(e.to_string())
            })?;

        Ok(row.get("present"))
    }
}
