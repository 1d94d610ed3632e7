use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Full payload describing one race and its competitors at fetch time.
///
/// Field names follow the platform's wire format; the camelCase aliases are
/// accepted as well so hand-written fixtures and exports load the same way.
/// Identifiers may arrive as JSON strings or numbers and are kept as strings.
/// Dates take RFC 3339, naive UTC timestamps or epoch numbers; a null amount
/// counts as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RaceSnapshot {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,

    #[serde(default, alias = "name")]
    pub race_name: Option<String>,

    #[serde(default, alias = "prizePool", deserialize_with = "nullable_amount")]
    #[validate(range(min = 0.0, message = "prize pool must not be negative"))]
    pub prize_pool: f64,

    #[serde(default, alias = "currencyId", deserialize_with = "flexible_id")]
    pub currency_id: Option<String>,

    #[serde(default)]
    pub currency: Option<CurrencySnapshot>,

    #[serde(default, alias = "sponsorId", deserialize_with = "flexible_id")]
    pub sponsor_id: Option<String>,

    #[serde(default)]
    pub sponsor: Option<SponsorSnapshot>,

    #[serde(default, alias = "startDate", deserialize_with = "flexible_date")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, alias = "endDate", deserialize_with = "flexible_date")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub competitors: Vec<CompetitorSnapshot>,

    #[serde(default, alias = "eligibilityCodes")]
    #[validate(nested)]
    pub eligibility: Vec<EligibilityCodeSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencySnapshot {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SponsorSnapshot {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "vip_level_name", alias = "vipLevel")]
    pub vip_level: Option<String>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompetitorSnapshot {
    #[serde(default, alias = "competitorId", deserialize_with = "flexible_id")]
    pub competitor_id: Option<String>,

    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,

    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,

    #[serde(default, rename = "vip_level_name", alias = "vipLevel")]
    pub vip_level: Option<String>,

    #[serde(default, rename = "avatar", alias = "avatarUrl")]
    pub avatar_url: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "position is 1-indexed"))]
    pub position: Option<i64>,

    #[serde(default, alias = "totalWagered", deserialize_with = "nullable_amount")]
    #[validate(range(min = 0.0, message = "wagered amount must not be negative"))]
    pub total_wagered: f64,

    #[serde(default, alias = "winnerAmount", deserialize_with = "nullable_amount")]
    #[validate(range(min = 0.0, message = "prize amount must not be negative"))]
    pub winner_amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EligibilityCodeSnapshot {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default, alias = "usageLimit")]
    pub usage_limit: Option<i64>,

    #[serde(default, alias = "usageCount")]
    #[validate(range(min = 0))]
    pub usage_count: i64,

    #[serde(default, alias = "totalWagered", deserialize_with = "nullable_amount")]
    #[validate(range(min = 0.0))]
    pub total_wagered: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

fn flexible_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Integer(n) => n.to_string(),
    }))
}

fn nullable_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Epoch(i64),
}

/// Epoch values above this are milliseconds (year 5138 in seconds)
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn flexible_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let parsed = match Option::<RawDate>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawDate::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(RawDate::Text(text)) => parse_date_text(&text)
            .ok_or_else(|| D::Error::custom(format!("unrecognized date: {}", text)))?,
        Some(RawDate::Epoch(n)) => {
            let date = if n.abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(n)
            } else {
                DateTime::from_timestamp(n, 0)
            };
            date.ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", n)))?
        }
    };
    Ok(Some(parsed))
}
