use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::dto::player::{PlayerRaceHistoryEntry, PlayerWithHistory};
use crate::error::{Result, StorageError};
use crate::models::{PerformanceRecord, Player};

const PLAYER_COLUMNS: &str = r#"
    player_id, display_name, vip_level, avatar_url, total_races_participated,
    total_wagered, total_prizes_won, best_position, avg_position, win_rate,
    roi_percentage, first_race_date, last_race_date, created_at
"#;

pub struct PlayerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find player by ID
    pub async fn find_by_id(&self, player_id: &str) -> Result<Player> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT ");
        query
            .push(PLAYER_COLUMNS)
            .push(" FROM players WHERE player_id = ")
            .push_bind(player_id);

        let player = query
            .build_query_as::<Player>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(player)
    }

    /// Players with at least one race, best earners first
    pub async fn list_top(&self, limit: i64) -> Result<Vec<Player>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT ");
        query
            .push(PLAYER_COLUMNS)
            .push(
                r#"
                FROM players
                WHERE total_races_participated > 0
                ORDER BY total_prizes_won DESC, roi_percentage DESC, player_id
                LIMIT "#,
            )
            .push_bind(limit.max(0));

        let players = query.build_query_as::<Player>().fetch_all(self.pool).await?;

        Ok(players)
    }

    /// Every race the player took part in, newest first
    pub async fn history(&self, player_id: &str) -> Result<Vec<PlayerRaceHistoryEntry>> {
        let entries = sqlx::query_as::<_, PlayerRaceHistoryEntry>(
            r#"
            SELECT r.race_id, r.race_name, r.prize_pool, r.start_date, r.total_competitors,
                   rp.position, rp.total_wagered, rp.winner_amount, rp.roi_percentage,
                   ph.performance_score
            FROM race_participants rp
            JOIN races r ON r.race_id = rp.race_id
            LEFT JOIN player_performance_history ph
                ON ph.player_id = rp.player_id AND ph.race_id = rp.race_id
            WHERE rp.player_id = ?
            ORDER BY r.start_date DESC, CAST(r.race_id AS INTEGER) DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn performance_record(
        &self,
        player_id: &str,
        race_id: &str,
    ) -> Result<PerformanceRecord> {
        let record = sqlx::query_as::<_, PerformanceRecord>(
            r#"
            SELECT player_id, race_id, race_date, position, wagered, prize_won,
                   competitors_count, performance_score, created_at
            FROM player_performance_history
            WHERE player_id = ? AND race_id = ?
            "#,
        )
        .bind(player_id)
        .bind(race_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    /// Top players, each with their full race history attached
    pub async fn list_with_history(&self, limit: i64) -> Result<Vec<PlayerWithHistory>> {
        let players = self.list_top(limit).await?;

        let mut result = Vec::with_capacity(players.len());
        for player in players {
            let race_history = self.history(&player.player_id).await?;
            result.push(PlayerWithHistory {
                player,
                race_history,
            });
        }

        Ok(result)
    }
}
