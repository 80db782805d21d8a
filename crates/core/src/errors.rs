use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown outcome category `{0}`")]
    UnknownOutcome(String),
    #[error("unknown company blocklist status `{0}`")]
    UnknownBlocklistStatus(String),
    #[error("unknown contact status `{0}`")]
    UnknownContactStatus(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable label used by the CLI `error_class` field.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Persistence(_) => "store",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Persistence(_) => 5,
            Self::Domain(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_error_maps_to_validation_class() {
        let error = ApplicationError::from(DomainError::InvariantViolation(
            "company over daily cap".to_owned(),
        ));

        assert_eq!(error.error_class(), "domain_validation");
        assert_eq!(error.exit_code(), 6);
        assert!(error.to_string().contains("company over daily cap"));
    }

    #[test]
    fn persistence_error_maps_to_store_class() {
        let error = ApplicationError::Persistence("database is locked".to_owned());

        assert_eq!(error.error_class(), "store");
        assert_eq!(error.exit_code(), 5);
    }

    #[test]
    fn configuration_error_maps_to_config_class() {
        let error = ApplicationError::Configuration("bad cooldown".to_owned());

        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
    }
}
