use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::dto::ingest::IngestedRace;
use crate::error::{Result, StorageError};
use crate::models::{
    NormalizedCode, NormalizedCompetitor, NormalizedSnapshot, NormalizedSponsor, Participation,
    Race, RaceSnapshot, SponsorCode,
};
use crate::services::aggregates;
use crate::services::performance_score::{PerformanceScore, participation_roi};

pub struct RaceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RaceRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert every entity of a snapshot and rebuild the affected aggregates.
    ///
    /// Runs as a single transaction: on any error nothing of the snapshot is
    /// persisted and the error is returned to the caller.
    pub async fn ingest(&self, snapshot: &RaceSnapshot) -> Result<IngestedRace> {
        let normalized = NormalizedSnapshot::new(snapshot)?;

        let mut tx = self.pool.begin().await?;
        let ingested = self
            .ingest_normalized(&normalized, &mut tx)
            .await
            .map_err(StorageError::classify)?;
        tx.commit().await?;

        info!(
            race_id = %ingested.race_id,
            competitors = ingested.competitors,
            "Stored race"
        );

        Ok(ingested)
    }

    async fn ingest_normalized(
        &self,
        snapshot: &NormalizedSnapshot,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<IngestedRace> {
        let race_id = snapshot.race_id();

        let previous_sponsor = sqlx::query_scalar::<_, Option<String>>(
            "SELECT sponsor_id FROM races WHERE race_id = ?",
        )
        .bind(race_id)
        .fetch_optional(&mut **tx)
        .await?
        .flatten();

        if let Some(sponsor) = &snapshot.sponsor {
            self.upsert_sponsor(sponsor, tx).await?;
        }

        let sponsor_id = self.resolve_sponsor_ref(snapshot, tx).await?;
        self.upsert_race(snapshot, sponsor_id.as_deref(), tx).await?;

        let competitors = snapshot.competitor_count();
        for competitor in &snapshot.competitors {
            self.upsert_player(competitor, tx).await?;
            self.upsert_participation(race_id, competitor, tx).await?;
            self.upsert_performance_record(snapshot, competitor, competitors, tx)
                .await?;
        }

        for code in &snapshot.codes {
            self.upsert_sponsor_code(race_id, code, tx).await?;
        }

        aggregates::recompute_race(tx, race_id).await?;
        let players = aggregates::recompute_players_in_race(tx, race_id).await?;
        debug!(race_id, players, "Recomputed player aggregates");

        let mut sponsors: Vec<&str> = sponsor_id.iter().map(String::as_str).collect();
        if let Some(previous) = previous_sponsor.as_deref() {
            if !sponsors.contains(&previous) {
                debug!(race_id, previous, "Race changed sponsor");
                sponsors.push(previous);
            }
        }
        for sponsor in sponsors {
            aggregates::recompute_sponsor(tx, sponsor).await?;
        }

        Ok(IngestedRace {
            race_id: race_id.to_string(),
            competitors: snapshot.competitors.len(),
            prize_pool: snapshot.race.prize_pool,
            total_wagered: snapshot.competitors.iter().map(|c| c.total_wagered).sum(),
            sponsor_username: snapshot.sponsor.as_ref().map(|s| s.username.clone()),
        })
    }

    /// A bare sponsor id without a sponsor payload is only kept when the
    /// sponsor is already known.
    async fn resolve_sponsor_ref(
        &self,
        snapshot: &NormalizedSnapshot,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Option<String>> {
        let Some(sponsor_ref) = snapshot.race.sponsor_ref.as_deref() else {
            return Ok(None);
        };

        if snapshot.sponsor.is_some() {
            return Ok(Some(sponsor_ref.to_string()));
        }

        let known = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM sponsors WHERE sponsor_id = ?)",
        )
        .bind(sponsor_ref)
        .fetch_one(&mut **tx)
        .await?;

        if known != 0 {
            Ok(Some(sponsor_ref.to_string()))
        } else {
            debug!(
                race_id = snapshot.race_id(),
                sponsor_ref, "Dropping reference to unknown sponsor"
            );
            Ok(None)
        }
    }

    async fn upsert_sponsor(
        &self,
        sponsor: &NormalizedSponsor,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sponsors (sponsor_id, username, vip_level, preferences)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (sponsor_id)
            DO UPDATE SET
                username = excluded.username,
                vip_level = excluded.vip_level,
                preferences = excluded.preferences
            "#,
        )
        .bind(&sponsor.sponsor_id)
        .bind(&sponsor.username)
        .bind(&sponsor.vip_level)
        .bind(&sponsor.preferences)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_race(
        &self,
        snapshot: &NormalizedSnapshot,
        sponsor_id: Option<&str>,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        let race = &snapshot.race;

        sqlx::query(
            r#"
            INSERT INTO races
                (race_id, sponsor_id, race_name, prize_pool, currency_id, currency_code,
                 start_date, end_date, style)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (race_id)
            DO UPDATE SET
                sponsor_id = excluded.sponsor_id,
                race_name = excluded.race_name,
                prize_pool = excluded.prize_pool,
                currency_id = excluded.currency_id,
                currency_code = excluded.currency_code,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                style = excluded.style
            "#,
        )
        .bind(&race.race_id)
        .bind(sponsor_id)
        .bind(&race.name)
        .bind(race.prize_pool)
        .bind(&race.currency_id)
        .bind(&race.currency_code)
        .bind(race.start_date)
        .bind(race.end_date)
        .bind(&race.style)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_player(
        &self,
        competitor: &NormalizedCompetitor,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO players (player_id, display_name, vip_level, avatar_url)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (player_id)
            DO UPDATE SET
                display_name = excluded.display_name,
                vip_level = excluded.vip_level,
                avatar_url = excluded.avatar_url
            "#,
        )
        .bind(&competitor.player_id)
        .bind(&competitor.display_name)
        .bind(&competitor.vip_level)
        .bind(&competitor.avatar_url)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_participation(
        &self,
        race_id: &str,
        competitor: &NormalizedCompetitor,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        let roi = participation_roi(competitor.total_wagered, competitor.winner_amount);

        sqlx::query(
            r#"
            INSERT INTO race_participants
                (race_id, player_id, position, total_wagered, winner_amount, roi_percentage)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (race_id, player_id)
            DO UPDATE SET
                position = excluded.position,
                total_wagered = excluded.total_wagered,
                winner_amount = excluded.winner_amount,
                roi_percentage = excluded.roi_percentage
            "#,
        )
        .bind(race_id)
        .bind(&competitor.player_id)
        .bind(competitor.position)
        .bind(competitor.total_wagered)
        .bind(competitor.winner_amount)
        .bind(roi)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_performance_record(
        &self,
        snapshot: &NormalizedSnapshot,
        competitor: &NormalizedCompetitor,
        competitors: i64,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        let score = PerformanceScore::compute(
            competitor.position,
            competitors,
            competitor.total_wagered,
            competitor.winner_amount,
        );

        sqlx::query(
            r#"
            INSERT INTO player_performance_history
                (player_id, race_id, race_date, position, wagered, prize_won,
                 competitors_count, performance_score)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (player_id, race_id)
            DO UPDATE SET
                race_date = excluded.race_date,
                position = excluded.position,
                wagered = excluded.wagered,
                prize_won = excluded.prize_won,
                competitors_count = excluded.competitors_count,
                performance_score = excluded.performance_score
            "#,
        )
        .bind(&competitor.player_id)
        .bind(snapshot.race_id())
        .bind(snapshot.race_date())
        .bind(competitor.position)
        .bind(competitor.total_wagered)
        .bind(competitor.winner_amount)
        .bind(competitors)
        .bind(score.total())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn upsert_sponsor_code(
        &self,
        race_id: &str,
        code: &NormalizedCode,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sponsor_codes
                (code_id, race_id, code, usage_limit, usage_count, total_wagered)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (code_id)
            DO UPDATE SET
                race_id = excluded.race_id,
                code = excluded.code,
                usage_limit = excluded.usage_limit,
                usage_count = excluded.usage_count,
                total_wagered = excluded.total_wagered
            "#,
        )
        .bind(&code.code_id)
        .bind(race_id)
        .bind(&code.code)
        .bind(code.usage_limit)
        .bind(code.usage_count)
        .bind(code.total_wagered)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Find race by ID
    pub async fn find_by_id(&self, race_id: &str) -> Result<Race> {
        let race = sqlx::query_as::<_, Race>(
            r#"
            SELECT race_id, sponsor_id, race_name, prize_pool, currency_id, currency_code,
                   start_date, end_date, style, total_competitors, total_wagered,
                   avg_wager_per_competitor, total_prizes_distributed,
                   prize_distribution_efficiency, wager_spread, wager_concentration,
                   competition_intensity, created_at
            FROM races
            WHERE race_id = ?
            "#,
        )
        .bind(race_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(race)
    }

    pub async fn exists(&self, race_id: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM races WHERE race_id = ?)",
        )
        .bind(race_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists != 0)
    }

    /// Highest numeric race id stored, if any
    pub async fn latest_id(&self) -> Result<Option<i64>> {
        let latest = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(CAST(race_id AS INTEGER)) FROM races",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(latest)
    }

    pub async fn list(&self) -> Result<Vec<Race>> {
        let races = sqlx::query_as::<_, Race>(
            r#"
            SELECT race_id, sponsor_id, race_name, prize_pool, currency_id, currency_code,
                   start_date, end_date, style, total_competitors, total_wagered,
                   avg_wager_per_competitor, total_prizes_distributed,
                   prize_distribution_efficiency, wager_spread, wager_concentration,
                   competition_intensity, created_at
            FROM races
            ORDER BY CAST(race_id AS INTEGER), race_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(races)
    }

    pub async fn list_participations(&self, race_id: &str) -> Result<Vec<Participation>> {
        let participations = sqlx::query_as::<_, Participation>(
            r#"
            SELECT race_id, player_id, position, total_wagered, winner_amount,
                   roi_percentage, created_at
            FROM race_participants
            WHERE race_id = ?
            ORDER BY position, player_id
            "#,
        )
        .bind(race_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participations)
    }

    pub async fn list_sponsor_codes(&self, race_id: &str) -> Result<Vec<SponsorCode>> {
        let codes = sqlx::query_as::<_, SponsorCode>(
            r#"
            SELECT code_id, race_id, code, usage_limit, usage_count, total_wagered, created_at
            FROM sponsor_codes
            WHERE race_id = ?
            ORDER BY code_id
            "#,
        )
        .bind(race_id)
        .fetch_all(self.pool)
        .await?;

        Ok(codes)
    }
}
