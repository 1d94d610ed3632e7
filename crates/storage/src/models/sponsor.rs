use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Sponsor {
    pub sponsor_id: String,
    pub username: String,
    pub vip_level: Option<String>,
    /// Raw JSON preferences as delivered by the platform
    pub preferences: String,
    pub total_races_sponsored: i64,
    pub total_prize_pool: f64,
    pub avg_prize_per_race: f64,
    pub first_race_date: Option<DateTime<Utc>>,
    pub last_race_date: Option<DateTime<Utc>>,
    pub created_at: NaiveDateTime,
}
