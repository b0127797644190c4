// Point planner for vacation-club resorts: finds stay windows that use up a points budget

pub mod config;
pub mod embedded;
pub mod point_source;
pub mod provider;
pub mod report;
pub mod resort;
pub mod scanner;

// Re-export key types for convenience
pub use config::{ConfigError, DataSource, PlannerConfig};
pub use embedded::EmbeddedProvider;
pub use point_source::{ChartPointSource, FlatRatePointSource, Lookahead, PointSource, PointsError};
pub use provider::{FileStoreProvider, ReferenceDataError, ReferenceDataProvider, StubProvider};
pub use report::{LineReporter, TripReporter};
pub use resort::{PointBlock, Points, Resort, RoomType, Trip};
pub use scanner::{scan_concurrently, ScanContext, ScanError, ScanStop, ScanSummary, TripScanner, TripWindows};
