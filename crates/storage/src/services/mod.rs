pub mod aggregates;
pub mod competition;
pub mod performance_score;
