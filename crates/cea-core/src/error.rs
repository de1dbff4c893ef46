//! Unified error types for the CEA network and dispatch crates
//!
//! This module provides a common error type [`CeaError`] that can represent
//! errors from any part of the system. Crate-level code returns
//! [`CeaResult`]; binaries wrap it in `anyhow` with added context.
//!
//! Infeasible load flows are *not* errors: the topology optimizer turns them
//! into an infinite fitness so the worker pool keeps running.
//!
//! # Example
//!
//! ```ignore
//! use cea_core::{CeaError, CeaResult};
//!
//! fn plan(path: &str) -> CeaResult<()> {
//!     let streets = load_street_network(path)?;
//!     initial_network(&streets)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all CEA operations.
#[derive(Error, Debug)]
pub enum CeaError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network structure errors
    #[error("Network error: {0}")]
    Network(String),

    /// A time-stepped simulation could not process an hour
    #[error("Simulation error at hour {hour}: {message}")]
    Simulation { hour: usize, message: String },

    /// Installed plant capacity cannot cover the residual demand
    #[error("Insufficient installed capacity at hour {hour}: {remaining_w:.1} W unserved")]
    InsufficientCapacity { hour: usize, remaining_w: f64 },

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using CeaError.
pub type CeaResult<T> = Result<T, CeaError>;

impl CeaError {
    /// Attach an hour index to an error raised inside an hourly step.
    pub fn at_hour(self, hour: usize) -> Self {
        match self {
            CeaError::Simulation { message, .. } => CeaError::Simulation { hour, message },
            CeaError::InsufficientCapacity { remaining_w, .. } => {
                CeaError::InsufficientCapacity { hour, remaining_w }
            }
            other => CeaError::Simulation {
                hour,
                message: other.to_string(),
            },
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for CeaError {
    fn from(err: anyhow::Error) -> Self {
        CeaError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for CeaError {
    fn from(s: String) -> Self {
        CeaError::Other(s)
    }
}

impl From<&str> for CeaError {
    fn from(s: &str) -> Self {
        CeaError::Other(s.to_string())
    }
}

// JSON parsing errors
impl From<serde_json::Error> for CeaError {
    fn from(err: serde_json::Error) -> Self {
        CeaError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CeaError::Network("no plant node".into());
        assert!(err.to_string().contains("Network error"));
        assert!(err.to_string().contains("no plant node"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cea_err: CeaError = io_err.into();
        assert!(matches!(cea_err, CeaError::Io(_)));
    }

    #[test]
    fn test_at_hour_rewrites_hour() {
        let err = CeaError::InsufficientCapacity {
            hour: 0,
            remaining_w: 12.0,
        }
        .at_hour(17);
        assert!(err.to_string().contains("hour 17"));

        let wrapped = CeaError::Validation("NaN demand".into()).at_hour(3);
        assert!(matches!(wrapped, CeaError::Simulation { hour: 3, .. }));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> CeaResult<()> {
            Err(CeaError::Validation("test".into()))
        }

        fn outer() -> CeaResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
