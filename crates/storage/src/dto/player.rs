use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Player;

/// One entry of a player's race history, newest race first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PlayerRaceHistoryEntry {
    pub race_id: String,
    pub race_name: String,
    pub prize_pool: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub total_competitors: i64,
    pub position: i64,
    pub total_wagered: f64,
    pub winner_amount: f64,
    pub roi_percentage: f64,
    pub performance_score: Option<f64>,
}

/// Player row enriched with the full race history, as written by exports
#[derive(Debug, Clone, Serialize)]
pub struct PlayerWithHistory {
    #[serde(flatten)]
    pub player: Player,
    pub race_history: Vec<PlayerRaceHistoryEntry>,
}
