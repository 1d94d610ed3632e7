use std::time::Duration;

use storage::{IngestedRace, RaceStore};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use crate::config::CollectorConfig;
use crate::error::{CollectorError, Result};
use crate::summary::{CollectionSummary, CycleSummary};
use crate::traits::RaceSource;

enum Outcome {
    Stored(IngestedRace),
    Empty,
}

/// Drives a [`RaceSource`] over race ids and persists what it returns.
///
/// Requests are strictly sequential. Per-id failures are recorded and the
/// loop moves on to the next id.
pub struct RaceCollector<S> {
    source: S,
    store: RaceStore,
    config: CollectorConfig,
}

impl<S: RaceSource> RaceCollector<S> {
    pub fn new(source: S, store: RaceStore, config: CollectorConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    pub fn store(&self) -> &RaceStore {
        &self.store
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    async fn fetch_and_store(&self, race_id: i64) -> Result<Outcome> {
        match self.source.fetch_race_by_id(race_id).await? {
            Some(snapshot) => {
                let ingested = self.store.ingest_race_snapshot(&snapshot).await?;
                Ok(Outcome::Stored(ingested))
            }
            None => Ok(Outcome::Empty),
        }
    }

    /// Collect every id of `start_id..=end_id`, pausing `delay` between requests.
    pub async fn collect_range(
        &self,
        start_id: i64,
        end_id: i64,
        delay: Duration,
    ) -> Result<CollectionSummary> {
        if start_id < 1 {
            return Err(CollectorError::InvalidRange {
                start: start_id,
                end: end_id,
            });
        }

        info!("Starting race collection: {} to {}", start_id, end_id);
        let mut summary = CollectionSummary::start();
        let total = end_id.saturating_sub(start_id).saturating_add(1).max(0);

        for race_id in start_id..=end_id {
            info!(
                "[{}/{}] Fetching race {}",
                race_id - start_id + 1,
                total,
                race_id
            );

            match self.fetch_and_store(race_id).await {
                Ok(Outcome::Stored(ingested)) => {
                    info!(
                        race_id,
                        competitors = ingested.competitors,
                        "Successfully processed race"
                    );
                    summary.record_success(&ingested);
                }
                Ok(Outcome::Empty) => {
                    warn!(race_id, "No race data found");
                    summary.record_failure(format!("No race data found for race {}", race_id));
                }
                Err(e) => {
                    log_failure(race_id, &e);
                    summary.record_failure(format!("Error processing race {}: {}", race_id, e));
                }
            }

            if race_id < end_id && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        summary.finish();
        info!(
            "Collection finished: {} succeeded, {} failed",
            summary.successful_collections, summary.failed_collections
        );

        Ok(summary)
    }

    /// Highest stored race id, or the configured default for an empty store
    pub async fn latest_known_id(&self) -> Result<i64> {
        let latest = self.store.latest_race_id().await?;
        Ok(latest.unwrap_or(self.config.default_latest_id))
    }

    /// Re-collect the ids estimated to cover the last `days_back` days.
    pub async fn collect_recent(&self, days_back: u32) -> Result<CollectionSummary> {
        let latest = self.latest_known_id().await?;
        let (start_id, end_id) = recent_window(
            latest,
            days_back,
            self.config.races_per_week,
            self.config.lookahead,
        );

        info!(
            days_back,
            latest, "Collecting recent races {} to {}", start_id, end_id
        );
        self.collect_range(start_id, end_id, self.config.request_delay)
            .await
    }

    /// One pass over `[latest - lookback, latest + lookahead]`, skipping stored ids.
    pub async fn run_monitor_cycle(&self, lookback: i64) -> Result<CycleSummary> {
        let latest = self.latest_known_id().await?;
        let start_id = latest.saturating_sub(lookback).max(1);
        let end_id = latest.saturating_add(self.config.lookahead);

        info!("Checking for new races: {} to {}", start_id, end_id);
        let mut cycle = CycleSummary::new(start_id, end_id);

        for race_id in start_id..=end_id {
            if self.store.race_exists(&race_id.to_string()).await? {
                debug!(race_id, "Race already stored");
                cycle.skipped += 1;
                continue;
            }

            if cycle.attempted > 0 && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }
            cycle.attempted += 1;

            match self.fetch_and_store(race_id).await {
                Ok(Outcome::Stored(_)) => {
                    info!(race_id, "Found and stored new race");
                    cycle.stored += 1;
                }
                Ok(Outcome::Empty) => debug!(race_id, "No race yet"),
                Err(e) => {
                    log_failure(race_id, &e);
                    if e.is_transient() {
                        cycle.failed += 1;
                    } else {
                        cycle.rejected += 1;
                    }
                }
            }
        }

        if cycle.stored > 0 {
            info!("Found {} new races", cycle.stored);
        } else {
            info!("No new races found");
        }

        Ok(cycle)
    }

    /// Poll for new races every `interval` until `shutdown` fires.
    ///
    /// `lookback` falls back to the configured value. The signal is honoured
    /// between cycles and while sleeping, never in the middle of a cycle.
    /// Returns the number of cycles that ran.
    pub async fn monitor_continuous(
        &self,
        interval: Duration,
        lookback: Option<i64>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> u64 {
        let lookback = lookback.unwrap_or(self.config.lookback);
        info!(
            interval_secs = interval.as_secs(),
            lookback, "Starting race monitoring"
        );
        let mut cycles = 0;

        loop {
            match shutdown.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => break,
            }

            let pause = match self.run_monitor_cycle(lookback).await {
                Ok(cycle) => {
                    debug!(?cycle, "Monitor cycle complete");
                    interval
                }
                Err(e) => {
                    error!(error = %e, "Error in race monitoring");
                    self.config.recovery_sleep
                }
            };
            cycles += 1;

            tokio::select! {
                _ = shutdown.recv() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!(cycles, "Race monitoring stopped");
        cycles
    }
}

fn log_failure(race_id: i64, e: &CollectorError) {
    if e.is_transient() {
        warn!(race_id, error = %e, "Failed to fetch race");
    } else {
        error!(race_id, error = %e, "Failed to store race");
    }
}

/// Id window `(start, end)` expected to hold the races of the last `days_back` days.
pub fn recent_window(
    latest_id: i64,
    days_back: u32,
    races_per_week: f64,
    lookahead: i64,
) -> (i64, i64) {
    let estimated = (days_back as f64 / 7.0 * races_per_week).floor() as i64;
    (
        latest_id.saturating_sub(estimated).max(1),
        latest_id.saturating_add(lookahead),
    )
}
