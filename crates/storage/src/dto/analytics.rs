use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Participations grouped by the player's current VIP level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VipLevelBreakdown {
    pub vip_level: String,
    pub participations: i64,
    pub total_wagered: f64,
    pub total_prizes: f64,
    pub avg_position: f64,
    pub avg_wager: f64,
    pub avg_prize: f64,
    pub roi_percentage: f64,
}

/// Prizes awarded at one finishing position across all races
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PositionPrizes {
    pub position: i64,
    pub total_awards: i64,
    pub avg_prize: f64,
    pub max_prize: f64,
    pub min_prize: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrizeDistribution {
    pub total_prize_pools: f64,
    pub total_distributed: f64,
    pub avg_distribution_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RaceCompetition {
    pub race_id: String,
    pub race_name: String,
    pub competitor_count: i64,
    pub total_wagered: f64,
    pub avg_wager: f64,
    pub wager_spread: f64,
    pub wager_concentration: f64,
    pub competition_intensity: f64,
}

/// Competition figures over races that had at least one competitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionMetrics {
    pub avg_competitors_per_race: f64,
    pub most_competitive_race: Option<RaceCompetition>,
    pub highest_stakes_race: Option<RaceCompetition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CurrencyUsage {
    pub currency_code: String,
    pub races: i64,
    pub total_prize_pool: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceAnalytics {
    pub prize_distribution: PrizeDistribution,
    pub prize_by_position: Vec<PositionPrizes>,
    pub competition: CompetitionMetrics,
    pub vip_levels: Vec<VipLevelBreakdown>,
    pub currencies: Vec<CurrencyUsage>,
}
