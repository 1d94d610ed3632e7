use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Point-in-time performance of a player in a race, upserted on `(player_id, race_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PerformanceRecord {
    pub player_id: String,
    pub race_id: String,
    pub race_date: Option<DateTime<Utc>>,
    pub position: i64,
    pub wagered: f64,
    pub prize_won: f64,
    pub competitors_count: i64,
    pub performance_score: f64,
    pub created_at: NaiveDateTime,
}
