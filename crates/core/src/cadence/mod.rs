pub mod aggregate;
pub mod allocate;
pub mod classify;
pub mod compliance;
pub mod policy;
pub mod roster;
pub mod schedule;
pub mod stats;
pub mod validate;

pub use aggregate::{CallHistory, ContactAccumulator};
pub use allocate::{
    allocate, count_workable_by_company, AllocationStats, DailySheet, SheetEntry, SheetOutcome,
    SheetPriority,
};
pub use classify::{classify, Classification};
pub use compliance::{run_compliance_check, BlockKind, ComplianceReport};
pub use policy::{ComplianceAuditPolicy, OperationalPolicy};
pub use roster::{build_roster, roster_digest};
pub use schedule::{select_candidates, CandidateLists};
pub use stats::{roster_stats, RosterStats};
pub use validate::{validate_sheet, PolicySheetValidator, SheetCheck, SheetValidator};
