//! Error types for Campaign Dash.

use std::time::Duration;

use crate::onboarding::validation::FieldErrors;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the onboarding wizard's public operations.
///
/// Validation and team-member errors are local: the wizard stays where it is
/// and the caller shows the annotation next to the offending field.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Step {step} has invalid fields: {}", describe_fields(errors))]
    Validation { step: u8, errors: FieldErrors },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Team member {email} is already on the list")]
    DuplicateEmail { email: String },

    #[error("A team can have at most {max} members")]
    TeamLimit { max: usize },

    #[error("This onboarding flow has no team step")]
    TeamNotSupported,

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),
}

/// Failures of a single `submit()` attempt.
///
/// The wizard state is left untouched on every variant so the caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("A submission is already in flight")]
    InFlight,

    #[error("Onboarding was already submitted")]
    AlreadyCompleted,

    #[error("Missing required fields: {}", missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },

    #[error("Step {step} no longer passes validation: {}", describe_fields(errors))]
    Invalid { step: u8, errors: FieldErrors },

    #[error("Organization service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Organization service rejected the request: {0}")]
    Rejected(String),

    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

fn describe_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Required".to_string());
        errors.insert("url", "Enter a valid URL".to_string());
        let err = OnboardingError::Validation { step: 1, errors };
        assert_eq!(
            err.to_string(),
            "Step 1 has invalid fields: name: Required; url: Enter a valid URL"
        );
    }

    #[test]
    fn incomplete_lists_missing_fields() {
        let err = SubmissionError::Incomplete {
            missing: vec!["age", "teamSize"],
        };
        assert_eq!(err.to_string(), "Missing required fields: age, teamSize");
    }

    #[test]
    fn submission_error_wraps_into_onboarding_error() {
        let err: OnboardingError = SubmissionError::InFlight.into();
        assert!(matches!(
            err,
            OnboardingError::Submission(SubmissionError::InFlight)
        ));
    }
}
