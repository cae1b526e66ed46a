//! Error types for loading and validating timetables.
//!
//! Constraint violations are not errors; they are reported in a
//! [`ValidationReport`](crate::report::ValidationReport).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Wrong command line.
    #[error("{0}")]
    Usage(String),

    /// An input file could not be opened or read.
    #[error("Couldn't open the file {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The instance stream ended early or carried an invalid value.
    #[error("Malformed instance: {0}")]
    MalformedInstance(String),

    /// The solution stream ended early or carried an invalid value.
    #[error("Malformed solution: {0}")]
    MalformedSolution(String),

    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ValidatorError {
    /// Process exit status for this failure kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            ValidatorError::Usage(_) => 2,
            ValidatorError::FileNotFound { .. } => 3,
            ValidatorError::MalformedInstance(_) => 4,
            ValidatorError::MalformedSolution(_) => 5,
            ValidatorError::Io { .. } | ValidatorError::Serialize(_) => 1,
        }
    }
}

pub type ValidatorResult<T> = Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let not_found = ValidatorError::FileNotFound {
            path: PathBuf::from("comp01.tim"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(not_found.exit_code(), 3);
        assert!(not_found.to_string().starts_with("Couldn't open the file comp01.tim"));
        assert_eq!(ValidatorError::Usage("x".into()).exit_code(), 2);
        assert_eq!(ValidatorError::MalformedInstance("x".into()).exit_code(), 4);
        assert_eq!(ValidatorError::MalformedSolution("x".into()).exit_code(), 5);
    }
}
