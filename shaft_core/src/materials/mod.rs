//! # Materials
//!
//! Strength data for the failure criteria. A material is either picked from
//! the SAE steel catalog or entered directly; both resolve to a
//! [`MaterialSpec`] in the active unit system (MPa or ksi).
//!
//! ## JSON Serialization
//!
//! ```json
//! { "type": "Catalog", "name": "SAE 1045 LF" }
//! { "type": "Custom", "ultimate": 600.0, "yield_strength": 480.0 }
//! ```
//!
//! Either strength of a custom material may be omitted; criteria that need it
//! report a missing field.

pub mod steel;

pub use steel::{Condition, SteelGrade};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

/// Ultimate and yield strength, in MPa (SI) or ksi (imperial).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Ultimate tensile strength Su
    pub ultimate: Option<f64>,
    /// Yield strength Sy
    pub yield_strength: Option<f64>,
}

impl MaterialSpec {
    /// Create a spec with both strengths known
    pub fn new(ultimate: f64, yield_strength: f64) -> Self {
        MaterialSpec {
            ultimate: Some(ultimate),
            yield_strength: Some(yield_strength),
        }
    }

    /// Su, or a MissingField error
    pub fn require_ultimate(&self) -> CalcResult<f64> {
        self.ultimate.ok_or_else(|| CalcError::missing_field("ultimate"))
    }

    /// Sy, or a MissingField error
    pub fn require_yield(&self) -> CalcResult<f64> {
        self.yield_strength
            .ok_or_else(|| CalcError::missing_field("yield_strength"))
    }
}

/// How the material is specified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialInput {
    /// Named entry of the steel catalog
    Catalog { name: String },
    /// Strengths entered directly
    Custom {
        #[serde(default)]
        ultimate: Option<f64>,
        #[serde(default)]
        yield_strength: Option<f64>,
    },
}

impl MaterialInput {
    /// Catalog material by name
    pub fn catalog(name: impl Into<String>) -> Self {
        MaterialInput::Catalog { name: name.into() }
    }

    /// Custom material with both strengths
    pub fn custom(ultimate: f64, yield_strength: f64) -> Self {
        MaterialInput::Custom {
            ultimate: Some(ultimate),
            yield_strength: Some(yield_strength),
        }
    }

    /// Resolve to strengths in the given unit system.
    pub fn resolve(&self, units: UnitSystem) -> CalcResult<MaterialSpec> {
        match self {
            MaterialInput::Catalog { name } => Ok(steel::lookup(name)?.strengths(units)),
            MaterialInput::Custom {
                ultimate,
                yield_strength,
            } => {
                for (field, value) in [("ultimate", ultimate), ("yield_strength", yield_strength)] {
                    if let Some(v) = value {
                        if !v.is_finite() || *v < 0.0 {
                            return Err(CalcError::invalid_input(
                                field,
                                v.to_string(),
                                "Strength must be a non-negative number",
                            ));
                        }
                    }
                }
                Ok(MaterialSpec {
                    ultimate: *ultimate,
                    yield_strength: *yield_strength,
                })
            }
        }
    }
}
