pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use dto::{
    DatabaseStatistics, IngestedRace, PlayerRaceHistoryEntry, PlayerWithHistory, RaceAnalytics,
    SponsorSummary,
};
pub use error::{Result, StorageError};
pub use models::RaceSnapshot;

use models::{Participation, PerformanceRecord, Player, Race, Sponsor, SponsorCode};
use repository::{PlayerRepository, RaceRepository, SponsorRepository, StatisticsRepository};

/// Persistent store for races, sponsors, players and their derived statistics.
#[derive(Clone)]
pub struct RaceStore {
    pool: SqlitePool,
}

impl RaceStore {
    /// Open (creating if missing) the database at `database_url`.
    ///
    /// Migrations are not applied here; call [`RaceStore::run_migrations`].
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if is_in_memory(database_url) {
            // Every connection would get its own empty database
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    /// Fresh migrated in-memory store
    pub async fn in_memory() -> Result<Self> {
        let store = Self::new("sqlite::memory:").await?;
        store.run_migrations().await?;
        Ok(store)
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ingest_race_snapshot(&self, snapshot: &RaceSnapshot) -> Result<IngestedRace> {
        RaceRepository::new(&self.pool).ingest(snapshot).await
    }

    pub async fn list_top_players(&self, limit: i64) -> Result<Vec<Player>> {
        PlayerRepository::new(&self.pool).list_top(limit).await
    }

    /// Race history of a player, newest race first. Empty for unknown players.
    pub async fn get_player_history(&self, player_id: &str) -> Result<Vec<PlayerRaceHistoryEntry>> {
        PlayerRepository::new(&self.pool).history(player_id).await
    }

    pub async fn list_players_with_history(&self, limit: i64) -> Result<Vec<PlayerWithHistory>> {
        PlayerRepository::new(&self.pool)
            .list_with_history(limit)
            .await
    }

    pub async fn get_sponsor_summary(&self, sponsor_id: &str) -> Result<SponsorSummary> {
        SponsorRepository::new(&self.pool).summary(sponsor_id).await
    }

    pub async fn query_statistics(&self) -> Result<DatabaseStatistics> {
        StatisticsRepository::new(&self.pool).overview().await
    }

    /// Prize, competition, VIP and currency analyses over the whole store
    pub async fn race_analytics(&self) -> Result<RaceAnalytics> {
        StatisticsRepository::new(&self.pool).analytics().await
    }

    pub async fn find_player(&self, player_id: &str) -> Result<Player> {
        PlayerRepository::new(&self.pool).find_by_id(player_id).await
    }

    pub async fn find_race(&self, race_id: &str) -> Result<Race> {
        RaceRepository::new(&self.pool).find_by_id(race_id).await
    }

    pub async fn list_races(&self) -> Result<Vec<Race>> {
        RaceRepository::new(&self.pool).list().await
    }

    pub async fn find_sponsor(&self, sponsor_id: &str) -> Result<Sponsor> {
        SponsorRepository::new(&self.pool).find_by_id(sponsor_id).await
    }

    pub async fn list_sponsors(&self) -> Result<Vec<SponsorSummary>> {
        SponsorRepository::new(&self.pool).list_by_prize_pool().await
    }

    pub async fn list_participations(&self, race_id: &str) -> Result<Vec<Participation>> {
        RaceRepository::new(&self.pool)
            .list_participations(race_id)
            .await
    }

    pub async fn list_sponsor_codes(&self, race_id: &str) -> Result<Vec<SponsorCode>> {
        RaceRepository::new(&self.pool)
            .list_sponsor_codes(race_id)
            .await
    }

    pub async fn find_performance_record(
        &self,
        player_id: &str,
        race_id: &str,
    ) -> Result<PerformanceRecord> {
        PlayerRepository::new(&self.pool)
            .performance_record(player_id, race_id)
            .await
    }

    pub async fn race_exists(&self, race_id: &str) -> Result<bool> {
        RaceRepository::new(&self.pool).exists(race_id).await
    }

    pub async fn latest_race_id(&self) -> Result<Option<i64>> {
        RaceRepository::new(&self.pool).latest_id().await
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    use super::*;
    use crate::models::{
        CompetitorSnapshot, CurrencySnapshot, EligibilityCodeSnapshot, SponsorSnapshot,
    };

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, d, 12, 0, 0).unwrap()
    }

    fn competitor(id: &str, position: i64, wagered: f64, prize: f64) -> CompetitorSnapshot {
        CompetitorSnapshot {
            competitor_id: Some(id.to_string()),
            display_name: Some(format!("Player {}", id)),
            vip_level: Some("GOLD".to_string()),
            position: Some(position),
            total_wagered: wagered,
            winner_amount: prize,
            ..Default::default()
        }
    }

    fn sponsor(id: &str, username: &str) -> SponsorSnapshot {
        SponsorSnapshot {
            id: Some(id.to_string()),
            username: Some(username.to_string()),
            vip_level: Some("DIAMOND".to_string()),
            preferences: Some(serde_json::json!({ "public": true })),
        }
    }

    fn race(id: &str, prize_pool: f64, competitors: Vec<CompetitorSnapshot>) -> RaceSnapshot {
        RaceSnapshot {
            id: Some(id.to_string()),
            race_name: Some(format!("Race {}", id)),
            prize_pool,
            start_date: Some(day(1)),
            end_date: Some(day(8)),
            style: Some("wager".to_string()),
            sponsor: Some(sponsor("s1", "bigspender")),
            competitors,
            ..Default::default()
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDateTime::default()
    }

    /// Players with `created_at` masked, for comparing separate stores
    async fn players(store: &RaceStore) -> Vec<Player> {
        let mut players = sqlx::query_as::<_, Player>("SELECT * FROM players ORDER BY player_id")
            .fetch_all(store.pool())
            .await
            .unwrap();
        for p in &mut players {
            p.created_at = stamp();
        }
        players
    }

    async fn dump(
        store: &RaceStore,
    ) -> (
        Vec<Sponsor>,
        Vec<Race>,
        Vec<Player>,
        Vec<Participation>,
        Vec<PerformanceRecord>,
        Vec<SponsorCode>,
    ) {
        let pool = store.pool();
        (
            sqlx::query_as("SELECT * FROM sponsors ORDER BY sponsor_id")
                .fetch_all(pool)
                .await
                .unwrap(),
            sqlx::query_as("SELECT * FROM races ORDER BY race_id")
                .fetch_all(pool)
                .await
                .unwrap(),
            sqlx::query_as("SELECT * FROM players ORDER BY player_id")
                .fetch_all(pool)
                .await
                .unwrap(),
            sqlx::query_as("SELECT * FROM race_participants ORDER BY race_id, player_id")
                .fetch_all(pool)
                .await
                .unwrap(),
            sqlx::query_as("SELECT * FROM player_performance_history ORDER BY player_id, race_id")
                .fetch_all(pool)
                .await
                .unwrap(),
            sqlx::query_as("SELECT * FROM sponsor_codes ORDER BY code_id")
                .fetch_all(pool)
                .await
                .unwrap(),
        )
    }

    async fn assert_sums_hold(store: &RaceStore) {
        for race in store.list_races().await.unwrap() {
            let participations = store.list_participations(&race.race_id).await.unwrap();
            let wagered: f64 = participations.iter().map(|p| p.total_wagered).sum();
            assert_eq!(race.total_wagered, wagered, "race {}", race.race_id);
            assert_eq!(race.total_competitors, participations.len() as i64);
        }

        let rows: Vec<Participation> = sqlx::query_as("SELECT * FROM race_participants")
            .fetch_all(store.pool())
            .await
            .unwrap();
        for player in players(store).await {
            let won: f64 = rows
                .iter()
                .filter(|p| p.player_id == player.player_id)
                .map(|p| p.winner_amount)
                .sum();
            assert_eq!(player.total_prizes_won, won, "player {}", player.player_id);
        }
    }

    #[tokio::test]
    async fn test_ingest_stores_race_and_derives_totals() {
        let store = RaceStore::in_memory().await.unwrap();
        let mut snapshot = race(
            "98",
            100.0,
            vec![
                competitor("a", 1, 1000.0, 60.0),
                competitor("b", 2, 500.0, 30.0),
                competitor("c", 3, 250.5, 10.0),
            ],
        );
        snapshot.eligibility = vec![EligibilityCodeSnapshot {
            id: Some("code-1".to_string()),
            code: Some("GAMBA".to_string()),
            usage_limit: Some(100),
            usage_count: 12,
            total_wagered: 1750.5,
        }];

        let ingested = store.ingest_race_snapshot(&snapshot).await.unwrap();
        assert_eq!(ingested.race_id, "98");
        assert_eq!(ingested.competitors, 3);
        assert_eq!(ingested.total_wagered, 1750.5);
        assert_eq!(ingested.sponsor_username.as_deref(), Some("bigspender"));

        let stored = store.find_race("98").await.unwrap();
        assert_eq!(stored.sponsor_id.as_deref(), Some("s1"));
        assert_eq!(stored.total_competitors, 3);
        assert_eq!(stored.total_wagered, 1750.5);
        assert_eq!(stored.total_prizes_distributed, 100.0);
        assert_eq!(stored.prize_distribution_efficiency, 100.0);
        assert_eq!(stored.avg_wager_per_competitor, 1750.5 / 3.0);
        assert_eq!(stored.start_date, Some(day(1)));

        let sponsor = store.find_sponsor("s1").await.unwrap();
        assert_eq!(sponsor.total_races_sponsored, 1);
        assert_eq!(sponsor.total_prize_pool, 100.0);
        assert_eq!(sponsor.avg_prize_per_race, 100.0);
        assert_eq!(sponsor.preferences, r#"{"public":true}"#);

        let codes = store.list_sponsor_codes("98").await.unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].usage_count, 12);

        let winner = store.find_player("a").await.unwrap();
        assert_eq!(winner.display_name, "Player a");
        assert_eq!(winner.best_position, Some(1));
        assert_eq!(winner.win_rate, 100.0);
        assert_eq!(winner.first_race_date, Some(day(1)));

        let participations = store.list_participations("98").await.unwrap();
        let a = participations.iter().find(|p| p.player_id == "a").unwrap();
        // (60 / 1000 - 1) * 100
        assert!((a.roi_percentage - -94.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reingesting_identical_snapshot_changes_nothing() {
        let store = RaceStore::in_memory().await.unwrap();
        let snapshot = race(
            "7",
            50.0,
            vec![competitor("a", 1, 100.0, 40.0), competitor("b", 2, 80.0, 10.0)],
        );

        store.ingest_race_snapshot(&snapshot).await.unwrap();
        let before = dump(&store).await;

        store.ingest_race_snapshot(&snapshot).await.unwrap();
        let after = dump(&store).await;

        assert_eq!(before, after);
        assert_eq!(after.3.len(), 2);
        assert_eq!(after.4.len(), 2);
    }

    #[tokio::test]
    async fn test_performance_record_uses_pinned_formula_and_race_date() {
        let store = RaceStore::in_memory().await.unwrap();
        let snapshot = race(
            "10",
            500.0,
            vec![
                competitor("a", 1, 100.0, 200.0),
                competitor("b", 2, 100.0, 110.0),
                competitor("c", 3, 100.0, 0.0),
                competitor("d", 4, 100.0, 0.0),
            ],
        );
        store.ingest_race_snapshot(&snapshot).await.unwrap();

        let a = store.find_performance_record("a", "10").await.unwrap();
        assert_eq!(a.performance_score, 100.0);
        assert_eq!(a.competitors_count, 4);
        assert_eq!(a.race_date, Some(day(8)));

        // (4 - 2 + 1) / 4 * 50 = 37.5, (110 / 100 - 1) * 100 = 10
        let b = store.find_performance_record("b", "10").await.unwrap();
        assert!((b.performance_score - 47.5).abs() < 1e-9);

        let d = store.find_performance_record("d", "10").await.unwrap();
        assert_eq!(d.performance_score, 12.5);
    }

    #[tokio::test]
    async fn test_missing_race_id_persists_nothing() {
        let store = RaceStore::in_memory().await.unwrap();
        let mut snapshot = race("1", 10.0, vec![competitor("a", 1, 5.0, 5.0)]);
        snapshot.id = None;

        let err = store.ingest_race_snapshot(&snapshot).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.query_statistics().await.unwrap(), DatabaseStatistics::default());
    }

    #[tokio::test]
    async fn test_constraint_failure_rolls_back_whole_snapshot() {
        let store = RaceStore::in_memory().await.unwrap();
        store
            .ingest_race_snapshot(&race("1", 10.0, vec![competitor("a", 1, 5.0, 5.0)]))
            .await
            .unwrap();

        // A second sponsor id claiming an existing username
        let mut clash = race("2", 20.0, vec![competitor("z", 1, 5.0, 5.0)]);
        clash.sponsor = Some(sponsor("s2", "bigspender"));

        let err = store.ingest_race_snapshot(&clash).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)), "{err:?}");

        assert!(!store.race_exists("2").await.unwrap());
        assert!(matches!(
            store.find_player("z").await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            store.find_sponsor("s2").await,
            Err(StorageError::NotFound)
        ));
        assert_eq!(store.query_statistics().await.unwrap().total_races, 1);
    }

    #[tokio::test]
    async fn test_reingest_with_different_competitors_updates_in_place() {
        let store = RaceStore::in_memory().await.unwrap();
        store
            .ingest_race_snapshot(&race(
                "3",
                100.0,
                vec![competitor("a", 1, 100.0, 70.0), competitor("b", 2, 50.0, 30.0)],
            ))
            .await
            .unwrap();

        let mut renamed = competitor("a", 2, 150.0, 30.0);
        renamed.display_name = Some("Renamed".to_string());
        store
            .ingest_race_snapshot(&race(
                "3",
                100.0,
                vec![renamed, competitor("c", 1, 200.0, 70.0)],
            ))
            .await
            .unwrap();

        let a = store.find_player("a").await.unwrap();
        assert_eq!(a.display_name, "Renamed");
        assert_eq!(a.total_races_participated, 1);
        assert_eq!(a.total_wagered, 150.0);
        assert_eq!(a.total_prizes_won, 30.0);
        assert_eq!(a.win_rate, 0.0);

        // Participations are never deleted, so b keeps its row
        let participations = store.list_participations("3").await.unwrap();
        assert_eq!(participations.len(), 3);
        assert_eq!(store.query_statistics().await.unwrap().total_players, 3);

        assert_sums_hold(&store).await;
    }

    #[tokio::test]
    async fn test_player_aggregates_span_all_races() {
        let store = RaceStore::in_memory().await.unwrap();
        store
            .ingest_race_snapshot(&race(
                "1",
                100.0,
                vec![competitor("a", 1, 100.0, 60.0), competitor("b", 2, 50.0, 40.0)],
            ))
            .await
            .unwrap();

        let mut second = race(
            "2",
            50.0,
            vec![competitor("b", 1, 25.0, 35.0), competitor("a", 3, 75.0, 0.0)],
        );
        second.start_date = Some(day(10));
        second.end_date = Some(day(17));
        store.ingest_race_snapshot(&second).await.unwrap();

        let a = store.find_player("a").await.unwrap();
        assert_eq!(a.total_races_participated, 2);
        assert_eq!(a.total_wagered, 175.0);
        assert_eq!(a.total_prizes_won, 60.0);
        assert_eq!(a.best_position, Some(1));
        assert_eq!(a.avg_position, Some(2.0));
        assert_eq!(a.win_rate, 50.0);
        assert_eq!(a.first_race_date, Some(day(1)));
        assert_eq!(a.last_race_date, Some(day(10)));

        let b = store.find_player("b").await.unwrap();
        // (75 / 75 - 1) * 100
        assert_eq!(b.roi_percentage, 0.0);

        let sponsor = store.find_sponsor("s1").await.unwrap();
        assert_eq!(sponsor.total_races_sponsored, 2);
        assert_eq!(sponsor.total_prize_pool, 150.0);
        assert_eq!(sponsor.avg_prize_per_race, 75.0);
        assert_eq!(sponsor.last_race_date, Some(day(10)));

        assert_sums_hold(&store).await;
    }

    #[tokio::test]
    async fn test_aggregates_do_not_depend_on_ingestion_order() {
        let first = race(
            "1",
            100.0,
            vec![competitor("a", 1, 100.0, 60.0), competitor("b", 2, 50.0, 40.0)],
        );
        let mut second = race(
            "2",
            40.0,
            vec![competitor("b", 1, 25.5, 30.0), competitor("c", 2, 10.25, 10.0)],
        );
        second.start_date = Some(day(10));

        let forward = RaceStore::in_memory().await.unwrap();
        forward.ingest_race_snapshot(&first).await.unwrap();
        forward.ingest_race_snapshot(&second).await.unwrap();

        let backward = RaceStore::in_memory().await.unwrap();
        backward.ingest_race_snapshot(&second).await.unwrap();
        backward.ingest_race_snapshot(&first).await.unwrap();

        assert_eq!(players(&forward).await, players(&backward).await);
        assert_eq!(
            forward.find_sponsor("s1").await.unwrap().total_prize_pool,
            backward.find_sponsor("s1").await.unwrap().total_prize_pool
        );
    }

    #[tokio::test]
    async fn test_sponsor_change_recomputes_previous_sponsor() {
        let store = RaceStore::in_memory().await.unwrap();
        let snapshot = race("5", 80.0, vec![competitor("a", 1, 10.0, 80.0)]);
        store.ingest_race_snapshot(&snapshot).await.unwrap();

        let mut moved = snapshot.clone();
        moved.sponsor = Some(sponsor("s2", "otherspender"));
        store.ingest_race_snapshot(&moved).await.unwrap();

        let old = store.find_sponsor("s1").await.unwrap();
        assert_eq!(old.total_races_sponsored, 0);
        assert_eq!(old.total_prize_pool, 0.0);
        assert_eq!(old.avg_prize_per_race, 0.0);
        assert_eq!(old.first_race_date, None);

        let new = store.find_sponsor("s2").await.unwrap();
        assert_eq!(new.total_races_sponsored, 1);
        assert_eq!(new.total_prize_pool, 80.0);
    }

    #[tokio::test]
    async fn test_bare_sponsor_reference_requires_known_sponsor() {
        let store = RaceStore::in_memory().await.unwrap();

        let mut unknown = race("1", 10.0, vec![]);
        unknown.sponsor = None;
        unknown.sponsor_id = Some("ghost".to_string());
        store.ingest_race_snapshot(&unknown).await.unwrap();
        assert_eq!(store.find_race("1").await.unwrap().sponsor_id, None);

        store
            .ingest_race_snapshot(&race("2", 30.0, vec![]))
            .await
            .unwrap();
        let mut known = race("3", 20.0, vec![]);
        known.sponsor = None;
        known.sponsor_id = Some("s1".to_string());
        store.ingest_race_snapshot(&known).await.unwrap();

        assert_eq!(store.find_race("3").await.unwrap().sponsor_id.as_deref(), Some("s1"));
        assert_eq!(store.find_sponsor("s1").await.unwrap().total_races_sponsored, 2);
    }

    #[tokio::test]
    async fn test_read_queries() {
        let store = RaceStore::in_memory().await.unwrap();
        store
            .ingest_race_snapshot(&race(
                "1",
                100.0,
                vec![competitor("a", 1, 100.0, 60.0), competitor("b", 2, 50.0, 40.0)],
            ))
            .await
            .unwrap();
        let mut later = race(
            "12",
            300.0,
            vec![competitor("b", 1, 20.0, 250.0), competitor("c", 2, 30.0, 50.0)],
        );
        later.start_date = Some(day(20));
        later.sponsor = Some(sponsor("s2", "whale"));
        store.ingest_race_snapshot(&later).await.unwrap();

        let top = store.list_top_players(2).await.unwrap();
        let ids: Vec<_> = top.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);

        let history = store.get_player_history("b").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].race_id, "12");
        assert_eq!(history[0].total_competitors, 2);
        assert!(history[0].performance_score.is_some());
        assert!(store.get_player_history("nobody").await.unwrap().is_empty());

        let summary = store.get_sponsor_summary("s1").await.unwrap();
        assert_eq!(summary.races_count, 1);
        assert_eq!(summary.avg_competitors, Some(2.0));
        assert_eq!(summary.avg_total_wagered, Some(150.0));
        assert!(matches!(
            store.get_sponsor_summary("missing").await,
            Err(StorageError::NotFound)
        ));

        let sponsors = store.list_sponsors().await.unwrap();
        assert_eq!(sponsors[0].sponsor.sponsor_id, "s2");
        assert_eq!(sponsors[1].sponsor.sponsor_id, "s1");

        let stats = store.query_statistics().await.unwrap();
        assert_eq!(
            stats,
            DatabaseStatistics {
                total_races: 2,
                total_prize_pools: 400.0,
                total_players: 3,
                total_sponsors: 2,
                total_participations: 4,
                total_wagered: 200.0,
            }
        );

        assert_eq!(store.latest_race_id().await.unwrap(), Some(12));
        assert!(store.race_exists("12").await.unwrap());
        assert!(!store.race_exists("13").await.unwrap());

        let exported = store.list_players_with_history(10).await.unwrap();
        assert_eq!(exported.len(), 3);
        assert_eq!(exported[0].race_history.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest_race() {
        let store = RaceStore::in_memory().await.unwrap();
        assert_eq!(store.latest_race_id().await.unwrap(), None);
        assert!(store.list_top_players(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_race_analytics() {
        let store = RaceStore::in_memory().await.unwrap();
        let usd = CurrencySnapshot {
            id: Some("404".to_string()),
            code: Some("USD".to_string()),
        };

        let mut platinum = competitor("c", 3, 30.0, 0.0);
        platinum.vip_level = Some("PLATINUM".to_string());
        let mut first = race(
            "1",
            100.0,
            vec![
                competitor("a", 1, 10.0, 60.0),
                competitor("b", 2, 20.0, 30.0),
                platinum,
            ],
        );
        first.currency = Some(usd.clone());
        let second = race("2", 50.0, vec![competitor("a", 1, 100.0, 50.0)]);
        let mut empty = race("3", 10.0, vec![]);
        empty.currency = Some(usd);

        for snapshot in [&first, &second, &empty] {
            store.ingest_race_snapshot(snapshot).await.unwrap();
        }

        let stored = store.find_race("1").await.unwrap();
        assert_eq!(stored.wager_spread, 20.0);
        assert_eq!(stored.wager_concentration, 50.0);
        assert_eq!(stored.competition_intensity, 30.0);

        let analytics = store.race_analytics().await.unwrap();

        let prizes = &analytics.prize_distribution;
        assert_eq!(prizes.total_prize_pools, 160.0);
        assert_eq!(prizes.total_distributed, 140.0);
        // (90 + 100 + 0) / 3
        assert!((prizes.avg_distribution_efficiency - 190.0 / 3.0).abs() < 1e-9);

        let positions: Vec<(i64, i64, f64, f64, f64)> = analytics
            .prize_by_position
            .iter()
            .map(|p| (p.position, p.total_awards, p.avg_prize, p.max_prize, p.min_prize))
            .collect();
        assert_eq!(
            positions,
            [
                (1, 2, 55.0, 60.0, 50.0),
                (2, 1, 30.0, 30.0, 30.0),
                (3, 1, 0.0, 0.0, 0.0)
            ]
        );

        let competition = &analytics.competition;
        assert_eq!(competition.avg_competitors_per_race, 2.0);
        let most = competition.most_competitive_race.as_ref().unwrap();
        assert_eq!((most.race_id.as_str(), most.competitor_count), ("1", 3));
        assert_eq!(most.avg_wager, 20.0);
        let highest = competition.highest_stakes_race.as_ref().unwrap();
        assert_eq!((highest.race_id.as_str(), highest.total_wagered), ("2", 100.0));

        let levels: Vec<&str> = analytics
            .vip_levels
            .iter()
            .map(|l| l.vip_level.as_str())
            .collect();
        assert_eq!(levels, ["GOLD", "PLATINUM"]);
        let gold = &analytics.vip_levels[0];
        assert_eq!(gold.participations, 3);
        assert_eq!(gold.total_wagered, 130.0);
        assert_eq!(gold.total_prizes, 140.0);
        assert!((gold.avg_position - 4.0 / 3.0).abs() < 1e-9);
        assert!((gold.roi_percentage - (140.0 / 130.0 - 1.0) * 100.0).abs() < 1e-9);
        assert_eq!(analytics.vip_levels[1].roi_percentage, -100.0);

        let currencies: Vec<(&str, i64, f64)> = analytics
            .currencies
            .iter()
            .map(|c| (c.currency_code.as_str(), c.races, c.total_prize_pool))
            .collect();
        assert_eq!(currencies, [("USD", 2, 110.0), ("UNKNOWN", 1, 50.0)]);
    }

    #[tokio::test]
    async fn test_analytics_of_empty_store() {
        let store = RaceStore::in_memory().await.unwrap();
        assert_eq!(store.race_analytics().await.unwrap(), RaceAnalytics::default());
    }
}
