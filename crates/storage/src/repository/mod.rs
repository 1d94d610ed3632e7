pub mod player;
pub mod race;
pub mod sponsor;
pub mod statistics;

pub use player::PlayerRepository;
pub use race::RaceRepository;
pub use sponsor::SponsorRepository;
pub use statistics::StatisticsRepository;
