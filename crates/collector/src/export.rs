use std::path::Path;

use storage::RaceStore;
use tracing::info;

use crate::error::Result;

pub const EXPORT_LIMIT: i64 = 1000;

/// Write the top players with their full race history as pretty JSON.
///
/// Returns how many players were exported.
pub async fn export_players(store: &RaceStore, path: &Path, limit: i64) -> Result<usize> {
    let players = store.list_players_with_history(limit).await?;

    let json = serde_json::to_string_pretty(&players)?;
    tokio::fs::write(path, json).await?;

    info!("Exported {} players to {}", players.len(), path.display());
    Ok(players.len())
}
