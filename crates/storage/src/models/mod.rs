mod normalized_snapshot;
mod participation;
mod performance_record;
mod player;
mod race;
mod race_snapshot;
mod sponsor;
mod sponsor_code;

pub use normalized_snapshot::{
    NormalizedCode, NormalizedCompetitor, NormalizedRace, NormalizedSnapshot, NormalizedSponsor,
};
pub use participation::Participation;
pub use performance_record::PerformanceRecord;
pub use player::Player;
pub use race::Race;
pub use race_snapshot::{
    CompetitorSnapshot, CurrencySnapshot, EligibilityCodeSnapshot, RaceSnapshot, SponsorSnapshot,
};
pub use sponsor::Sponsor;
pub use sponsor_code::SponsorCode;
