use chrono::{DateTime, Utc};
use validator::Validate;

use super::race_snapshot::{
    CompetitorSnapshot, EligibilityCodeSnapshot, RaceSnapshot, SponsorSnapshot,
};
use crate::error::{Result, StorageError};

/// A race snapshot whose identifiers have been resolved exactly once.
///
/// Construction is the only place where the competitor id fallback
/// (`competitor_id`, then `id`) and the other presence checks happen; code
/// downstream of ingestion only ever sees canonical identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSnapshot {
    pub race: NormalizedRace,
    pub sponsor: Option<NormalizedSponsor>,
    pub competitors: Vec<NormalizedCompetitor>,
    pub codes: Vec<NormalizedCode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRace {
    pub race_id: String,
    pub name: String,
    pub prize_pool: f64,
    pub currency_id: Option<String>,
    pub currency_code: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub style: Option<String>,
    /// Sponsor reference carried without a sponsor payload
    pub sponsor_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSponsor {
    pub sponsor_id: String,
    pub username: String,
    pub vip_level: Option<String>,
    pub preferences: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCompetitor {
    pub player_id: String,
    pub display_name: String,
    pub vip_level: Option<String>,
    pub avatar_url: Option<String>,
    pub position: i64,
    pub total_wagered: f64,
    pub winner_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCode {
    pub code_id: String,
    pub code: String,
    pub usage_limit: Option<i64>,
    pub usage_count: i64,
    pub total_wagered: f64,
}

impl NormalizedSnapshot {
    pub fn new(snapshot: &RaceSnapshot) -> Result<Self> {
        let race_id = non_empty(snapshot.id.as_deref())
            .ok_or_else(|| StorageError::Validation("race id is required".to_string()))?;

        snapshot.validate()?;

        let name = non_empty(snapshot.race_name.as_deref()).ok_or_else(|| {
            StorageError::Validation(format!("race {} has no name", race_id))
        })?;

        let sponsor = snapshot
            .sponsor
            .as_ref()
            .map(|s| normalize_sponsor(s, snapshot.sponsor_id.as_deref(), &race_id))
            .transpose()?;

        let sponsor_ref = match &sponsor {
            Some(s) => Some(s.sponsor_id.clone()),
            None => non_empty(snapshot.sponsor_id.as_deref()),
        };

        let currency = snapshot.currency.as_ref();
        let race = NormalizedRace {
            race_id: race_id.clone(),
            name,
            prize_pool: snapshot.prize_pool,
            currency_id: non_empty(snapshot.currency_id.as_deref())
                .or_else(|| currency.and_then(|c| non_empty(c.id.as_deref()))),
            currency_code: currency.and_then(|c| non_empty(c.code.as_deref())),
            start_date: snapshot.start_date,
            end_date: snapshot.end_date,
            style: snapshot.style.clone(),
            sponsor_ref,
        };

        let competitors = snapshot
            .competitors
            .iter()
            .enumerate()
            .map(|(idx, c)| normalize_competitor(c, idx, &race_id))
            .collect::<Result<Vec<_>>>()?;

        let codes = snapshot
            .eligibility
            .iter()
            .map(|c| normalize_code(c, &race_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            race,
            sponsor,
            competitors,
            codes,
        })
    }

    pub fn race_id(&self) -> &str {
        &self.race.race_id
    }

    /// Competitor count used as `N` in the position score
    pub fn competitor_count(&self) -> i64 {
        self.competitors.len() as i64
    }

    /// Date attached to performance records: end of the race, else its start
    pub fn race_date(&self) -> Option<DateTime<Utc>> {
        self.race.end_date.or(self.race.start_date)
    }
}

fn normalize_sponsor(
    sponsor: &SponsorSnapshot,
    race_sponsor_id: Option<&str>,
    race_id: &str,
) -> Result<NormalizedSponsor> {
    let sponsor_id = non_empty(sponsor.id.as_deref())
        .or_else(|| non_empty(race_sponsor_id))
        .ok_or_else(|| {
            StorageError::Validation(format!("sponsor of race {} has no id", race_id))
        })?;

    let username = non_empty(sponsor.username.as_deref()).ok_or_else(|| {
        StorageError::Validation(format!("sponsor {} has no username", sponsor_id))
    })?;

    let preferences = match &sponsor.preferences {
        Some(value) if !value.is_null() => serde_json::to_string(value)?,
        _ => "{}".to_string(),
    };

    Ok(NormalizedSponsor {
        sponsor_id,
        username,
        vip_level: sponsor.vip_level.clone(),
        preferences,
    })
}

fn normalize_competitor(
    competitor: &CompetitorSnapshot,
    idx: usize,
    race_id: &str,
) -> Result<NormalizedCompetitor> {
    let player_id = non_empty(competitor.competitor_id.as_deref())
        .or_else(|| non_empty(competitor.id.as_deref()))
        .ok_or_else(|| {
            StorageError::Validation(format!(
                "competitor #{} of race {} has neither competitor_id nor id",
                idx + 1,
                race_id
            ))
        })?;

    let position = competitor.position.ok_or_else(|| {
        StorageError::Validation(format!(
            "competitor {} of race {} has no position",
            player_id, race_id
        ))
    })?;

    // Hidden profiles come through without a display name
    let display_name =
        non_empty(competitor.display_name.as_deref()).unwrap_or_else(|| player_id.clone());

    Ok(NormalizedCompetitor {
        player_id,
        display_name,
        vip_level: competitor.vip_level.clone(),
        avatar_url: competitor.avatar_url.clone(),
        position,
        total_wagered: competitor.total_wagered,
        winner_amount: competitor.winner_amount,
    })
}

fn normalize_code(code: &EligibilityCodeSnapshot, race_id: &str) -> Result<NormalizedCode> {
    let code_id = non_empty(code.id.as_deref()).ok_or_else(|| {
        StorageError::Validation(format!("eligibility code of race {} has no id", race_id))
    })?;

    let value = non_empty(code.code.as_deref()).ok_or_else(|| {
        StorageError::Validation(format!("eligibility code {} has no code", code_id))
    })?;

    Ok(NormalizedCode {
        code_id,
        code: value,
        usage_limit: code.usage_limit,
        usage_count: code.usage_count,
        total_wagered: code.total_wagered,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
