pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod pipeline;
pub mod repositories;

pub use connection::{connect, connect_with_config, connect_with_settings, ping, DbPool};
pub use fixtures::{DemoDataset, SeedResult, VerificationResult};
pub use pipeline::{
    plan_daily_sheet, roster_stats, run_compliance_check, sync_roster, PipelineError, SyncOutcome,
};
pub use repositories::{CadenceRepositories, RepositoryError};
