pub mod cadence;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod errors;

pub use cadence::{
    ComplianceAuditPolicy, ComplianceReport, DailySheet, OperationalPolicy, RosterStats,
    SheetOutcome,
};
pub use domain::call::{CallEvent, OutcomeCategory};
pub use domain::company::{BlocklistStatus, Company, CompanyBlocklist};
pub use domain::contact::{ContactKey, ContactRecord, ContactStatus, Prospect};
pub use errors::{ApplicationError, DomainError};
