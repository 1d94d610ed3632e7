pub mod analytics;
pub mod ingest;
pub mod player;
pub mod sponsor;
pub mod statistics;

pub use analytics::{
    CompetitionMetrics, CurrencyUsage, PositionPrizes, PrizeDistribution, RaceAnalytics,
    RaceCompetition, VipLevelBreakdown,
};
pub use ingest::IngestedRace;
pub use player::{PlayerRaceHistoryEntry, PlayerWithHistory};
pub use sponsor::SponsorSummary;
pub use statistics::DatabaseStatistics;
