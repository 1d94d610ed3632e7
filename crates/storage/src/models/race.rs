use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Race {
    pub race_id: String,
    pub sponsor_id: Option<String>,
    pub race_name: String,
    pub prize_pool: f64,
    pub currency_id: Option<String>,
    pub currency_code: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub style: Option<String>,
    pub total_competitors: i64,
    pub total_wagered: f64,
    pub avg_wager_per_competitor: f64,
    pub total_prizes_distributed: f64,
    pub prize_distribution_efficiency: f64,
    pub wager_spread: f64,
    pub wager_concentration: f64,
    pub competition_intensity: f64,
    pub created_at: NaiveDateTime,
}
