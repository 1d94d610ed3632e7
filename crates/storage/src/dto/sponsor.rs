use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Sponsor;

/// Sponsor with averages over the races it funded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SponsorSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub sponsor: Sponsor,
    pub races_count: i64,
    pub avg_competitors: Option<f64>,
    pub avg_total_wagered: Option<f64>,
    pub avg_efficiency: Option<f64>,
}
