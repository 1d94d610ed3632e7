use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One player's placement in one race. Unique on `(race_id, player_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Participation {
    pub race_id: String,
    pub player_id: String,
    pub position: i64,
    pub total_wagered: f64,
    pub winner_amount: f64,
    pub roi_percentage: f64,
    pub created_at: NaiveDateTime,
}
