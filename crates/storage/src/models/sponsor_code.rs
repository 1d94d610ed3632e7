use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SponsorCode {
    pub code_id: String,
    pub race_id: String,
    pub code: String,
    pub usage_limit: Option<i64>,
    pub usage_count: i64,
    pub total_wagered: f64,
    pub created_at: NaiveDateTime,
}
