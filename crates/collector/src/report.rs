use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storage::models::Player;
use storage::{DatabaseStatistics, RaceAnalytics, RaceStore, SponsorSummary};
use tracing::info;

use crate::error::Result;
use crate::summary::CollectionSummary;

const TOP_PERFORMERS: i64 = 10;

/// Collection summary merged with a snapshot of the store.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub collection_summary: CollectionSummary,
    pub database_statistics: DatabaseStatistics,
    pub top_performers: Vec<Player>,
    pub sponsor_analysis: Vec<SponsorSummary>,
    pub analytics: RaceAnalytics,
    pub generated_at: DateTime<Utc>,
}

impl CollectionReport {
    pub async fn assemble(store: &RaceStore, summary: CollectionSummary) -> Result<Self> {
        Ok(Self {
            collection_summary: summary,
            database_statistics: store.query_statistics().await?,
            top_performers: store.list_top_players(TOP_PERFORMERS).await?,
            sponsor_analysis: store.list_sponsors().await?,
            analytics: store.race_analytics().await?,
            generated_at: Utc::now(),
        })
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        info!("Collection report written to {}", path.display());
        Ok(())
    }
}
