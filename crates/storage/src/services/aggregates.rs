//! Derived statistics, always rebuilt from the underlying rows.
//!
//! Every function here recomputes its aggregates as a full function of the
//! current participation (or race) rows of the owning entity. Nothing is
//! applied incrementally, so the result does not depend on the order in
//! which races were ingested.

use sqlx::{Sqlite, Transaction};

use crate::error::Result;
use crate::services::competition;

/// Rebuild competitor count, wager and prize totals, prize distribution
/// efficiency and wager dispersion for one race.
pub async fn recompute_race(tx: &mut Transaction<'_, Sqlite>, race_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE races SET
            total_competitors = (
                SELECT COUNT(*) FROM race_participants rp WHERE rp.race_id = races.race_id
            ),
            total_wagered = (
                SELECT COALESCE(SUM(rp.total_wagered), 0.0)
                FROM race_participants rp WHERE rp.race_id = races.race_id
            ),
            total_prizes_distributed = (
                SELECT COALESCE(SUM(rp.winner_amount), 0.0)
                FROM race_participants rp WHERE rp.race_id = races.race_id
            )
        WHERE race_id = ?
        "#,
    )
    .bind(race_id)
    .execute(&mut **tx)
    .await?;

    // Second pass reads the totals written above
    sqlx::query(
        r#"
        UPDATE races SET
            avg_wager_per_competitor = CASE
                WHEN total_competitors > 0 THEN total_wagered / total_competitors
                ELSE 0.0
            END,
            prize_distribution_efficiency = total_prizes_distributed / MAX(prize_pool, 1.0) * 100.0
        WHERE race_id = ?
        "#,
    )
    .bind(race_id)
    .execute(&mut **tx)
    .await?;

    let wagers = sqlx::query_scalar::<_, f64>(
        "SELECT total_wagered FROM race_participants WHERE race_id = ? ORDER BY player_id",
    )
    .bind(race_id)
    .fetch_all(&mut **tx)
    .await?;
    let dispersion = competition::wager_dispersion(&wagers);

    sqlx::query(
        r#"
        UPDATE races SET
            wager_spread = ?,
            wager_concentration = ?,
            competition_intensity = ?
        WHERE race_id = ?
        "#,
    )
    .bind(dispersion.spread)
    .bind(dispersion.concentration)
    .bind(dispersion.intensity)
    .bind(race_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Rebuild the aggregates of every player holding a participation in `race_id`,
/// each over all of that player's participations.
pub async fn recompute_players_in_race(
    tx: &mut Transaction<'_, Sqlite>,
    race_id: &str,
) -> Result<u64> {
    let updated = sqlx::query(
        r#"
        UPDATE players SET
            total_races_participated = (
                SELECT COUNT(*) FROM race_participants rp WHERE rp.player_id = players.player_id
            ),
            total_wagered = (
                SELECT COALESCE(SUM(rp.total_wagered), 0.0)
                FROM race_participants rp WHERE rp.player_id = players.player_id
            ),
            total_prizes_won = (
                SELECT COALESCE(SUM(rp.winner_amount), 0.0)
                FROM race_participants rp WHERE rp.player_id = players.player_id
            ),
            best_position = (
                SELECT MIN(rp.position) FROM race_participants rp WHERE rp.player_id = players.player_id
            ),
            avg_position = (
                SELECT AVG(rp.position) FROM race_participants rp WHERE rp.player_id = players.player_id
            ),
            win_rate = (
                SELECT COALESCE(
                    100.0 * SUM(CASE WHEN rp.position = 1 THEN 1 ELSE 0 END) / COUNT(*),
                    0.0
                )
                FROM race_participants rp WHERE rp.player_id = players.player_id
            ),
            first_race_date = (
                SELECT MIN(r.start_date)
                FROM race_participants rp
                JOIN races r ON r.race_id = rp.race_id
                WHERE rp.player_id = players.player_id
            ),
            last_race_date = (
                SELECT MAX(r.start_date)
                FROM race_participants rp
                JOIN races r ON r.race_id = rp.race_id
                WHERE rp.player_id = players.player_id
            )
        WHERE player_id IN (SELECT player_id FROM race_participants WHERE race_id = ?)
        "#,
    )
    .bind(race_id)
    .execute(&mut **tx)
    .await?
    .rows_affected();

    sqlx::query(
        r#"
        UPDATE players SET
            roi_percentage = CASE
                WHEN total_wagered > 0 THEN ((total_prizes_won / total_wagered) - 1) * 100.0
                ELSE 0.0
            END
        WHERE player_id IN (SELECT player_id FROM race_participants WHERE race_id = ?)
        "#,
    )
    .bind(race_id)
    .execute(&mut **tx)
    .await?;

    Ok(updated)
}

/// Rebuild race count, prize pool totals and race dates for one sponsor over
/// all races it funds.
pub async fn recompute_sponsor(tx: &mut Transaction<'_, Sqlite>, sponsor_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE sponsors SET
            total_races_sponsored = (
                SELECT COUNT(*) FROM races r WHERE r.sponsor_id = sponsors.sponsor_id
            ),
            total_prize_pool = (
                SELECT COALESCE(SUM(r.prize_pool), 0.0)
                FROM races r WHERE r.sponsor_id = sponsors.sponsor_id
            ),
            first_race_date = (
                SELECT MIN(r.start_date) FROM races r WHERE r.sponsor_id = sponsors.sponsor_id
            ),
            last_race_date = (
                SELECT MAX(r.start_date) FROM races r WHERE r.sponsor_id = sponsors.sponsor_id
            )
        WHERE sponsor_id = ?
        "#,
    )
    .bind(sponsor_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE sponsors SET
            avg_prize_per_race = CASE
                WHEN total_races_sponsored > 0 THEN total_prize_pool / total_races_sponsored
                ELSE 0.0
            END
        WHERE sponsor_id = ?
        "#,
    )
    .bind(sponsor_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
