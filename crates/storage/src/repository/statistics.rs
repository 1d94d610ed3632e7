use sqlx::SqlitePool;

use crate::dto::analytics::{
    CompetitionMetrics, CurrencyUsage, PositionPrizes, PrizeDistribution, RaceAnalytics,
    RaceCompetition, VipLevelBreakdown,
};
use crate::dto::statistics::DatabaseStatistics;
use crate::error::Result;

const RACE_COMPETITION_COLUMNS: &str = r#"
    SELECT race_id, race_name, total_competitors AS competitor_count, total_wagered,
           avg_wager_per_competitor AS avg_wager, wager_spread, wager_concentration,
           competition_intensity
    FROM races
    WHERE total_competitors > 0
"#;

pub struct StatisticsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatisticsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self) -> Result<DatabaseStatistics> {
        let (total_races, total_prize_pools) = sqlx::query_as::<_, (i64, f64)>(
            "SELECT COUNT(*), COALESCE(SUM(prize_pool), 0.0) FROM races",
        )
        .fetch_one(self.pool)
        .await?;

        let total_players = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(self.pool)
            .await?;

        let total_sponsors = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sponsors")
            .fetch_one(self.pool)
            .await?;

        let (total_participations, total_wagered) = sqlx::query_as::<_, (i64, f64)>(
            "SELECT COUNT(*), COALESCE(SUM(total_wagered), 0.0) FROM race_participants",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DatabaseStatistics {
            total_races,
            total_prize_pools,
            total_players,
            total_sponsors,
            total_participations,
            total_wagered,
        })
    }

    /// Every analysis below, read in one go
    pub async fn analytics(&self) -> Result<RaceAnalytics> {
        Ok(RaceAnalytics {
            prize_distribution: self.prize_distribution().await?,
            prize_by_position: self.prize_by_position().await?,
            competition: self.competition().await?,
            vip_levels: self.vip_levels().await?,
            currencies: self.currencies().await?,
        })
    }

    pub async fn prize_distribution(&self) -> Result<PrizeDistribution> {
        let (total_prize_pools, total_distributed, avg_distribution_efficiency) =
            sqlx::query_as::<_, (f64, f64, f64)>(
                r#"
                SELECT COALESCE(SUM(prize_pool), 0.0),
                       COALESCE(SUM(total_prizes_distributed), 0.0),
                       COALESCE(AVG(prize_distribution_efficiency), 0.0)
                FROM races
                "#,
            )
            .fetch_one(self.pool)
            .await?;

        Ok(PrizeDistribution {
            total_prize_pools,
            total_distributed,
            avg_distribution_efficiency,
        })
    }

    pub async fn prize_by_position(&self) -> Result<Vec<PositionPrizes>> {
        let positions = sqlx::query_as::<_, PositionPrizes>(
            r#"
            SELECT position,
                   COUNT(*) AS total_awards,
                   AVG(winner_amount) AS avg_prize,
                   MAX(winner_amount) AS max_prize,
                   MIN(winner_amount) AS min_prize
            FROM race_participants
            GROUP BY position
            ORDER BY position
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(positions)
    }

    pub async fn competition(&self) -> Result<CompetitionMetrics> {
        let avg_competitors_per_race = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(total_competitors), 0.0) FROM races WHERE total_competitors > 0",
        )
        .fetch_one(self.pool)
        .await?;

        let most_competitive_race = sqlx::query_as::<_, RaceCompetition>(&format!(
            "{} ORDER BY competition_intensity DESC, race_id LIMIT 1",
            RACE_COMPETITION_COLUMNS
        ))
        .fetch_optional(self.pool)
        .await?;

        let highest_stakes_race = sqlx::query_as::<_, RaceCompetition>(&format!(
            "{} ORDER BY total_wagered DESC, race_id LIMIT 1",
            RACE_COMPETITION_COLUMNS
        ))
        .fetch_optional(self.pool)
        .await?;

        Ok(CompetitionMetrics {
            avg_competitors_per_race,
            most_competitive_race,
            highest_stakes_race,
        })
    }

    /// Grouped by each player's current VIP level
    pub async fn vip_levels(&self) -> Result<Vec<VipLevelBreakdown>> {
        let levels = sqlx::query_as::<_, VipLevelBreakdown>(
            r#"
            SELECT COALESCE(p.vip_level, 'UNKNOWN') AS vip_level,
                   COUNT(*) AS participations,
                   COALESCE(SUM(rp.total_wagered), 0.0) AS total_wagered,
                   COALESCE(SUM(rp.winner_amount), 0.0) AS total_prizes,
                   AVG(rp.position) AS avg_position,
                   AVG(rp.total_wagered) AS avg_wager,
                   AVG(rp.winner_amount) AS avg_prize,
                   (COALESCE(SUM(rp.winner_amount), 0.0)
                       / MAX(COALESCE(SUM(rp.total_wagered), 0.0), 1.0) - 1) * 100.0
                       AS roi_percentage
            FROM race_participants rp
            JOIN players p ON p.player_id = rp.player_id
            GROUP BY COALESCE(p.vip_level, 'UNKNOWN')
            ORDER BY SUM(rp.total_wagered) DESC, vip_level
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(levels)
    }

    pub async fn currencies(&self) -> Result<Vec<CurrencyUsage>> {
        let currencies = sqlx::query_as::<_, CurrencyUsage>(
            r#"
            SELECT COALESCE(currency_code, 'UNKNOWN') AS currency_code,
                   COUNT(*) AS races,
                   COALESCE(SUM(prize_pool), 0.0) AS total_prize_pool
            FROM races
            GROUP BY COALESCE(currency_code, 'UNKNOWN')
            ORDER BY COUNT(*) DESC, currency_code
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(currencies)
    }
}
