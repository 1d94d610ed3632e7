use storage::RaceSnapshot;

use crate::Result;

/// Where race snapshots come from.
///
/// `Ok(None)` means the id is valid but no race exists for it; `Err` is a
/// transient failure that the caller may retry on a later run.
#[async_trait::async_trait]
pub trait RaceSource: Send + Sync {
    async fn fetch_race_by_id(&self, race_id: i64) -> Result<Option<RaceSnapshot>>;
}
