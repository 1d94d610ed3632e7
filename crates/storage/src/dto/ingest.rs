use serde::Serialize;

/// What a successful ingestion stored, in the shape a collection summary folds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestedRace {
    pub race_id: String,
    pub competitors: usize,
    pub prize_pool: f64,
    pub total_wagered: f64,
    pub sponsor_username: Option<String>,
}
