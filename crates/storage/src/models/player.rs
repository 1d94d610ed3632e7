use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub player_id: String,
    pub display_name: String,
    pub vip_level: Option<String>,
    pub avatar_url: Option<String>,
    pub total_races_participated: i64,
    pub total_wagered: f64,
    pub total_prizes_won: f64,
    pub best_position: Option<i64>,
    pub avg_position: Option<f64>,
    pub win_rate: f64,
    pub roi_percentage: f64,
    pub first_race_date: Option<DateTime<Utc>>,
    pub last_race_date: Option<DateTime<Utc>>,
    pub created_at: NaiveDateTime,
}
