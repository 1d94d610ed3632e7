use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::IngestedRace;
use tracing::{info, warn};
use uuid::Uuid;

/// Running totals of one range collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub run_id: Uuid,
    pub total_races_attempted: u64,
    pub successful_collections: u64,
    pub failed_collections: u64,
    pub total_players_found: u64,
    pub total_prize_pool: f64,
    pub total_wagered: f64,
    pub unique_sponsors: BTreeSet<String>,
    pub errors: Vec<String>,
    pub collection_start_time: DateTime<Utc>,
    pub collection_end_time: Option<DateTime<Utc>>,
}

impl CollectionSummary {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            total_races_attempted: 0,
            successful_collections: 0,
            failed_collections: 0,
            total_players_found: 0,
            total_prize_pool: 0.0,
            total_wagered: 0.0,
            unique_sponsors: BTreeSet::new(),
            errors: Vec::new(),
            collection_start_time: Utc::now(),
            collection_end_time: None,
        }
    }

    pub fn record_success(&mut self, race: &IngestedRace) {
        self.total_races_attempted += 1;
        self.successful_collections += 1;
        self.total_players_found += race.competitors as u64;
        self.total_prize_pool += race.prize_pool;
        self.total_wagered += race.total_wagered;
        if let Some(username) = &race.sponsor_username {
            self.unique_sponsors.insert(username.clone());
        }
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.total_races_attempted += 1;
        self.failed_collections += 1;
        self.errors.push(message.into());
    }

    pub fn finish(&mut self) {
        self.collection_end_time = Some(Utc::now());
    }

    /// Error lines as printed, truncated after `limit` entries
    pub fn error_lines(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .errors
            .iter()
            .take(limit)
            .map(|e| format!("  - {}", e))
            .collect();
        if self.errors.len() > limit {
            lines.push(format!("  - ... and {} more", self.errors.len() - limit));
        }
        lines
    }

    pub fn log(&self, error_limit: usize) {
        info!("Collection summary (run {})", self.run_id);
        info!("  Races attempted: {}", self.total_races_attempted);
        info!("  Successful: {}", self.successful_collections);
        info!("  Failed: {}", self.failed_collections);
        info!("  Players found: {}", self.total_players_found);
        info!("  Total prize pool: ${:.2}", self.total_prize_pool);
        info!("  Total wagered: ${:.2}", self.total_wagered);
        info!("  Unique sponsors: {}", self.unique_sponsors.len());
        if !self.unique_sponsors.is_empty() {
            let sponsors: Vec<&str> = self.unique_sponsors.iter().map(String::as_str).collect();
            info!("  Sponsors: {}", sponsors.join(", "));
        }

        if !self.errors.is_empty() {
            warn!("Errors ({}):", self.errors.len());
            for line in self.error_lines(error_limit) {
                warn!("{}", line);
            }
        }
    }
}

/// Outcome of one monitor cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub window_start: i64,
    pub window_end: i64,
    pub skipped: u64,
    pub attempted: u64,
    pub stored: u64,
    /// Source failures, retried on the next cycle
    pub failed: u64,
    /// Snapshots the store refused
    pub rejected: u64,
}

impl CycleSummary {
    pub fn new(window_start: i64, window_end: i64) -> Self {
        Self {
            window_start,
            window_end,
            skipped: 0,
            attempted: 0,
            stored: 0,
            failed: 0,
            rejected: 0,
        }
    }
}
