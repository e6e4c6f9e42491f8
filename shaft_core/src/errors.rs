//! # Error Types
//!
//! Structured error types for shaft_core. Every failure the engine can report
//! maps to one variant, so a caller can tell a bad input apart from an
//! unsolvable criterion without parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length: f64) -> CalcResult<()> {
//!     if length <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length",
//!             length.to_string(),
//!             "Shaft length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for shaft_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, malformed, wrong ordering)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A value required by the selected calculation was not supplied
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A load slot index outside the declared load count
    #[error("Load index {index} out of range (session holds {len} loads)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A formula was evaluated outside its domain (zero strength,
    /// negative radicand, degenerate support span)
    #[error("Domain error in {quantity}: {reason}")]
    Domain { quantity: String, reason: String },

    /// Root finding did not converge within its iteration budget.
    /// `last_residual` is the last finite residual seen, if any.
    #[error("Solver did not converge after {iterations} iterations")]
    ConvergenceFailed {
        iterations: usize,
        last_residual: Option<f64>,
    },

    /// Material not found in the catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an IndexOutOfRange error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        CalcError::IndexOutOfRange { index, len }
    }

    /// Create a Domain error
    pub fn domain(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConvergenceFailed error; a non-finite residual is dropped
    pub fn convergence_failed(iterations: usize, last_residual: Option<f64>) -> Self {
        CalcError::ConvergenceFailed {
            iterations,
            last_residual: last_residual.filter(|r| r.is_finite()),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Whether the caller can change inputs and retry on the same session.
    ///
    /// Domain and convergence failures come out of the criterion engine and
    /// leave the analysis usable; the rest indicate malformed input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::Domain { .. } | CalcError::ConvergenceFailed { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::ConvergenceFailed { .. } => "CONVERGENCE_FAILED",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length", "-5.0", "Shaft length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("\"type\":\"InvalidInput\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("su").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::index_out_of_range(3, 2).error_code(), "INDEX_OUT_OF_RANGE");
        assert_eq!(CalcError::domain("Se", "zero").error_code(), "DOMAIN_ERROR");
        assert_eq!(CalcError::convergence_failed(100, Some(1.0)).error_code(), "CONVERGENCE_FAILED");
    }

    #[test]
    fn test_recoverable() {
        assert!(CalcError::domain("Se", "zero").is_recoverable());
        assert!(CalcError::convergence_failed(10, Some(0.5)).is_recoverable());
        assert!(!CalcError::index_out_of_range(5, 2).is_recoverable());
    }

    #[test]
    fn test_convergence_error_survives_json() {
        for residual in [f64::NAN, f64::INFINITY] {
            let error = CalcError::convergence_failed(7, Some(residual));
            let json = serde_json::to_string(&error).unwrap();
            let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
            assert_eq!(error, roundtrip);
            assert_eq!(
                roundtrip,
                CalcError::ConvergenceFailed {
                    iterations: 7,
                    last_residual: None
                }
            );
        }

        let error = CalcError::convergence_failed(3, Some(0.25));
        let roundtrip: CalcError = serde_json::from_str(&serde_json::to_string(&error).unwrap()).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_display_mentions_index() {
        let msg = CalcError::index_out_of_range(4, 3).to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains('3'));
    }
}
