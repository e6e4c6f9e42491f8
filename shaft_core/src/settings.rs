//! # Analysis Settings
//!
//! Configuration shared by every step of one analysis: the unit system, the
//! diagram resolution and the root-finding budget. Settings serialize as part
//! of a job file; every field has a default, so `{}` is a valid settings
//! object.
//!
//! ```rust
//! use shaft_core::settings::AnalysisSettings;
//! use shaft_core::units::UnitSystem;
//!
//! let settings: AnalysisSettings = serde_json::from_str(r#"{ "units": "Imperial" }"#).unwrap();
//! assert_eq!(settings.units, UnitSystem::Imperial);
//! assert_eq!(settings.sample_count, 1000);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

/// Default number of diagram samples over the shaft length
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Settings for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Active unit system
    pub units: UnitSystem,

    /// Number of equally spaced diagram samples (including both ends)
    pub sample_count: usize,

    /// Inverse-solve parameters
    pub solver: SolverSettings,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            units: UnitSystem::Si,
            sample_count: DEFAULT_SAMPLE_COUNT,
            solver: SolverSettings::default(),
        }
    }
}

impl AnalysisSettings {
    /// Default settings in the given unit system
    pub fn with_units(units: UnitSystem) -> Self {
        AnalysisSettings {
            units,
            ..AnalysisSettings::default()
        }
    }

    /// Validate settings values.
    pub fn validate(&self) -> CalcResult<()> {
        if self.sample_count < 2 {
            return Err(CalcError::invalid_input(
                "sample_count",
                self.sample_count.to_string(),
                "At least two samples are needed to span the shaft",
            ));
        }
        self.solver.validate()
    }
}

/// Parameters of the bracketed root search used by the inverse solve.
///
/// The bracket is expressed in units of the system's length scale, so the
/// default `[1e-6, 1e3]` spans 10 nm to 10 m in SI and 0.1 µin to 100 in in
/// imperial units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub lower: f64,
    pub upper: f64,
    /// Iteration budget before reporting non-convergence
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            lower: 1e-6,
            upper: 1e3,
            max_iterations: 100,
        }
    }
}

impl SolverSettings {
    /// Validate solver parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.lower > 0.0 && self.lower.is_finite()) {
            return Err(CalcError::invalid_input(
                "solver.lower",
                self.lower.to_string(),
                "Bracket ends must be positive numbers",
            ));
        }
        if !(self.upper > self.lower && self.upper.is_finite()) {
            return Err(CalcError::invalid_input(
                "solver.upper",
                self.upper.to_string(),
                format!("Upper bracket end must exceed {}", self.lower),
            ));
        }
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "solver.max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.units, UnitSystem::Si);
        assert_eq!(settings.sample_count, 1000);
        assert_eq!(settings.solver.lower, 1e-6);
        assert_eq!(settings.solver.upper, 1e3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: AnalysisSettings =
            serde_json::from_str(r#"{ "solver": { "max_iterations": 20 } }"#).unwrap();
        assert_eq!(settings.solver.max_iterations, 20);
        assert_eq!(settings.solver.upper, 1e3);
        assert_eq!(settings.sample_count, DEFAULT_SAMPLE_COUNT);
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = AnalysisSettings::default();
        settings.sample_count = 1;
        assert!(settings.validate().is_err());

        let mut settings = AnalysisSettings::default();
        settings.solver.lower = -0.5;
        assert!(settings.validate().is_err());

        let mut settings = AnalysisSettings::default();
        settings.solver.upper = settings.solver.lower;
        assert!(settings.validate().is_err());

        let mut settings = AnalysisSettings::default();
        settings.solver.max_iterations = 0;
        assert!(settings.validate().is_err());
    }
}
