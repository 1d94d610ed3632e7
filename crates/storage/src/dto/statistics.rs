use serde::{Deserialize, Serialize};

/// Store-wide counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStatistics {
    pub total_races: i64,
    pub total_prize_pools: f64,
    pub total_players: i64,
    pub total_sponsors: i64,
    pub total_participations: i64,
    pub total_wagered: f64,
}
