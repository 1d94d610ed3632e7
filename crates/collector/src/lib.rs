pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod report;
pub mod sources;
pub mod summary;
pub mod traits;

pub use config::{CollectorConfig, SourceConfig};
pub use error::{CollectorError, Result};
pub use orchestrator::{RaceCollector, recent_window};
pub use report::CollectionReport;
pub use sources::gamba::GambaClient;
pub use summary::{CollectionSummary, CycleSummary};
pub use traits::RaceSource;
