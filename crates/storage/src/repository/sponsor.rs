use sqlx::SqlitePool;

use crate::dto::sponsor::SponsorSummary;
use crate::error::{Result, StorageError};
use crate::models::Sponsor;

pub struct SponsorRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SponsorRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find sponsor by ID
    pub async fn find_by_id(&self, sponsor_id: &str) -> Result<Sponsor> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            r#"
            SELECT sponsor_id, username, vip_level, preferences, total_races_sponsored,
                   total_prize_pool, avg_prize_per_race, first_race_date, last_race_date,
                   created_at
            FROM sponsors
            WHERE sponsor_id = ?
            "#,
        )
        .bind(sponsor_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(sponsor)
    }

    /// Sponsor row with averages over its races
    pub async fn summary(&self, sponsor_id: &str) -> Result<SponsorSummary> {
        let summary = sqlx::query_as::<_, SponsorSummary>(
            r#"
            SELECT s.sponsor_id, s.username, s.vip_level, s.preferences,
                   s.total_races_sponsored, s.total_prize_pool, s.avg_prize_per_race,
                   s.first_race_date, s.last_race_date, s.created_at,
                   COUNT(r.race_id) AS races_count,
                   AVG(r.total_competitors) AS avg_competitors,
                   AVG(r.total_wagered) AS avg_total_wagered,
                   AVG(r.prize_distribution_efficiency) AS avg_efficiency
            FROM sponsors s
            LEFT JOIN races r ON r.sponsor_id = s.sponsor_id
            WHERE s.sponsor_id = ?
            GROUP BY s.sponsor_id
            "#,
        )
        .bind(sponsor_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(summary)
    }

    /// Sponsor analysis, largest total prize pool first
    pub async fn list_by_prize_pool(&self) -> Result<Vec<SponsorSummary>> {
        let sponsors = sqlx::query_as::<_, SponsorSummary>(
            r#"
            SELECT s.sponsor_id, s.username, s.vip_level, s.preferences,
                   s.total_races_sponsored, s.total_prize_pool, s.avg_prize_per_race,
                   s.first_race_date, s.last_race_date, s.created_at,
                   COUNT(r.race_id) AS races_count,
                   AVG(r.total_competitors) AS avg_competitors,
                   AVG(r.total_wagered) AS avg_total_wagered,
                   AVG(r.prize_distribution_efficiency) AS avg_efficiency
            FROM sponsors s
            LEFT JOIN races r ON r.sponsor_id = s.sponsor_id
            GROUP BY s.sponsor_id
            ORDER BY s.total_prize_pool DESC, s.sponsor_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(sponsors)
    }
}
