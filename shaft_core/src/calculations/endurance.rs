//! # Endurance Limit
//!
//! The fully corrected endurance limit is either entered directly or built
//! from the specimen value Se′ and the Marin factors:
//!
//! ```text
//! Se = ka · kb · kc · kd · ke · Se′
//! ```
//!
//! | Factor | Effect               |
//! |--------|----------------------|
//! | ka     | Surface finish       |
//! | kb     | Size                 |
//! | kc     | Load type            |
//! | kd     | Temperature          |
//! | ke     | Reliability          |
//!
//! ## Size factor
//!
//! kb is entered directly or follows a diameter power law:
//!
//! | Range  | SI (d in m)            | Imperial (d in in)     |
//! |--------|------------------------|------------------------|
//! | small  | 0.592 d^−0.107 (≤ 51 mm) | 0.879 d^−0.107 (≤ 2 in) |
//! | large  | 0.51 d^−0.157          | 0.91 d^−0.157          |
//!
//! The two laws do not meet exactly at the threshold; no blending is applied.
//!
//! ## Neutral fallback
//!
//! Factors arrive as text. A blank factor counts as 1. If any factor fails to
//! parse, every factor is replaced by 1 and the model is flagged with
//! `neutral_fallback`, which travels with the evaluation result.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::fields::parse_optional;
use crate::units::UnitSystem;

/// Exponent of the small-diameter size law
pub const SMALL_EXPONENT: f64 = -0.107;
/// Exponent of the large-diameter size law
pub const LARGE_EXPONENT: f64 = -0.157;

/// How kb is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SizeFactorMode {
    /// Small-diameter power law
    Small,
    /// Large-diameter power law
    Large,
    /// Entered value (blank = 1)
    #[default]
    Direct,
    /// Small or large law chosen by the diameter
    Auto,
}

/// Coefficient of the small-diameter law
pub fn small_coefficient(units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Si => 0.592,
        UnitSystem::Imperial => 0.879,
    }
}

/// Coefficient of the large-diameter law
pub fn large_coefficient(units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Si => 0.51,
        UnitSystem::Imperial => 0.91,
    }
}

/// Diameter separating the two size laws
pub fn size_threshold(units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Si => 0.051,
        UnitSystem::Imperial => 2.0,
    }
}

/// Marin factors as entered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarinFactorInputs {
    pub ka: Option<String>,
    pub kb: Option<String>,
    pub kc: Option<String>,
    pub kd: Option<String>,
    pub ke: Option<String>,
    pub size: SizeFactorMode,
}

impl MarinFactorInputs {
    /// Numeric factors, with kb entered directly
    pub fn from_values(ka: f64, kb: f64, kc: f64, kd: f64, ke: f64) -> Self {
        MarinFactorInputs {
            ka: Some(ka.to_string()),
            kb: Some(kb.to_string()),
            kc: Some(kc.to_string()),
            kd: Some(kd.to_string()),
            ke: Some(ke.to_string()),
            size: SizeFactorMode::Direct,
        }
    }

    /// Same factors with a different size mode
    pub fn with_size(mut self, size: SizeFactorMode) -> Self {
        self.size = size;
        self
    }
}

/// Resolved size factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeFactor {
    Fixed(f64),
    Small,
    Large,
    Auto,
}

/// Resolved Marin factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarinFactors {
    pub ka: f64,
    pub kb: SizeFactor,
    pub kc: f64,
    pub kd: f64,
    pub ke: f64,
}

impl MarinFactors {
    /// All factors 1
    pub fn neutral() -> Self {
        MarinFactors {
            ka: 1.0,
            kb: SizeFactor::Fixed(1.0),
            kc: 1.0,
            kd: 1.0,
            ke: 1.0,
        }
    }

    /// kb at the given diameter.
    pub fn size_factor(&self, diameter: f64, units: UnitSystem) -> CalcResult<f64> {
        let law = match self.kb {
            SizeFactor::Fixed(kb) => return Ok(kb),
            SizeFactor::Auto if diameter <= size_threshold(units) => SizeFactor::Small,
            SizeFactor::Auto => SizeFactor::Large,
            law => law,
        };
        if !(diameter > 0.0 && diameter.is_finite()) {
            return Err(CalcError::domain(
                "kb",
                format!("Size law needs a positive diameter, got {}", diameter),
            ));
        }
        let threshold = size_threshold(units);
        let kb = match law {
            SizeFactor::Small => {
                if diameter > threshold {
                    debug!("kb: small-diameter law used at d={} above {}", diameter, threshold);
                }
                small_coefficient(units) * diameter.powf(SMALL_EXPONENT)
            }
            _ => {
                if diameter <= threshold {
                    debug!("kb: large-diameter law used at d={} below {}", diameter, threshold);
                }
                large_coefficient(units) * diameter.powf(LARGE_EXPONENT)
            }
        };
        Ok(kb)
    }

    /// Product of every factor at the given diameter
    pub fn product(&self, diameter: f64, units: UnitSystem) -> CalcResult<f64> {
        Ok(self.ka * self.size_factor(diameter, units)? * self.kc * self.kd * self.ke)
    }
}

/// Parse the entered factors, degrading to neutral on any malformed value.
/// Returns the factors and whether the fallback was taken.
pub fn resolve_factors(inputs: &MarinFactorInputs) -> (MarinFactors, bool) {
    let parsed = (|| -> CalcResult<MarinFactors> {
        let factor = |name: &str, raw: &Option<String>| -> CalcResult<f64> {
            Ok(parse_optional(name, raw.as_deref())?.unwrap_or(1.0))
        };
        let kb = match inputs.size {
            SizeFactorMode::Direct => SizeFactor::Fixed(factor("kb", &inputs.kb)?),
            SizeFactorMode::Small => SizeFactor::Small,
            SizeFactorMode::Large => SizeFactor::Large,
            SizeFactorMode::Auto => SizeFactor::Auto,
        };
        Ok(MarinFactors {
            ka: factor("ka", &inputs.ka)?,
            kb,
            kc: factor("kc", &inputs.kc)?,
            kd: factor("kd", &inputs.kd)?,
            ke: factor("ke", &inputs.ke)?,
        })
    })();

    match parsed {
        Ok(factors) => (factors, false),
        Err(err) => {
            warn!("Marin factors unreadable ({}); using neutral factors", err);
            (MarinFactors::neutral(), true)
        }
    }
}

/// Endurance limit as entered, in MPa or ksi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EnduranceInput {
    /// Corrected endurance limit Se
    Direct { se: f64 },
    /// Specimen endurance limit Se′ and Marin factors
    Marin {
        se_prime: f64,
        #[serde(default)]
        factors: MarinFactorInputs,
    },
}

impl EnduranceInput {
    /// Resolve into a model that can be evaluated at any diameter.
    pub fn resolve(&self, units: UnitSystem) -> CalcResult<EnduranceModel> {
        match self {
            EnduranceInput::Direct { se } => {
                check_finite("se", *se)?;
                Ok(EnduranceModel {
                    base: *se,
                    factors: None,
                    neutral_fallback: false,
                    units,
                })
            }
            EnduranceInput::Marin { se_prime, factors } => {
                check_finite("se_prime", *se_prime)?;
                let (resolved, neutral_fallback) = resolve_factors(factors);
                Ok(EnduranceModel {
                    base: *se_prime,
                    factors: Some(resolved),
                    neutral_fallback,
                    units,
                })
            }
        }
    }
}

fn check_finite(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Value must be finite"))
    }
}

/// Endurance limit ready for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnduranceModel {
    base: f64,
    factors: Option<MarinFactors>,
    neutral_fallback: bool,
    units: UnitSystem,
}

impl EnduranceModel {
    /// Se at the given diameter, in MPa or ksi
    pub fn at(&self, diameter: f64) -> CalcResult<f64> {
        match &self.factors {
            None => Ok(self.base),
            Some(factors) => Ok(factors.product(diameter, self.units)? * self.base),
        }
    }

    /// True when malformed factors were replaced by 1
    pub fn neutral_fallback(&self) -> bool {
        self.neutral_fallback
    }

    /// True when Se changes with the diameter
    pub fn depends_on_diameter(&self) -> bool {
        matches!(
            self.factors,
            Some(MarinFactors {
                kb: SizeFactor::Small | SizeFactor::Large | SizeFactor::Auto,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct() {
        let model = EnduranceInput::Direct { se: 210.0 }.resolve(UnitSystem::Si).unwrap();
        assert_eq!(model.at(0.03).unwrap(), 210.0);
        assert!(!model.neutral_fallback());
        assert!(!model.depends_on_diameter());
    }

    #[test]
    fn test_marin_product() {
        let input = EnduranceInput::Marin {
            se_prime: 300.0,
            factors: MarinFactorInputs::from_values(0.8, 0.9, 1.0, 1.0, 0.814),
        };
        let model = input.resolve(UnitSystem::Si).unwrap();
        assert_relative_eq!(model.at(0.05).unwrap(), 300.0 * 0.8 * 0.9 * 0.814, max_relative = 1e-12);
    }

    #[test]
    fn test_blank_factors_are_neutral() {
        let factors = MarinFactorInputs {
            ka: Some("0.7".to_string()),
            kc: Some("   ".to_string()),
            ..MarinFactorInputs::default()
        };
        let (resolved, fallback) = resolve_factors(&factors);
        assert!(!fallback);
        assert_eq!(resolved.ka, 0.7);
        assert_eq!(resolved.kc, 1.0);
        assert_eq!(resolved.kb, SizeFactor::Fixed(1.0));
    }

    #[test]
    fn test_malformed_factor_falls_back_and_flags() {
        let factors = MarinFactorInputs {
            ka: Some("0.7".to_string()),
            kd: Some("hot".to_string()),
            ..MarinFactorInputs::default()
        };
        let input = EnduranceInput::Marin {
            se_prime: 250.0,
            factors,
        };
        let model = input.resolve(UnitSystem::Si).unwrap();
        assert!(model.neutral_fallback());
        assert_eq!(model.at(0.02).unwrap(), 250.0);
    }

    #[test]
    fn test_size_laws_si() {
        let small = MarinFactors {
            kb: SizeFactor::Small,
            ..MarinFactors::neutral()
        };
        // Shigley: 1.24 d^-0.107 with d in mm; d = 25 mm → 0.879
        assert_relative_eq!(small.size_factor(0.025, UnitSystem::Si).unwrap(), 0.879, max_relative = 2e-3);

        let large = MarinFactors {
            kb: SizeFactor::Large,
            ..MarinFactors::neutral()
        };
        // 1.51 d^-0.157 with d = 100 mm → 0.733
        assert_relative_eq!(large.size_factor(0.1, UnitSystem::Si).unwrap(), 0.733, max_relative = 3e-3);
    }

    #[test]
    fn test_size_laws_imperial() {
        let small = MarinFactors {
            kb: SizeFactor::Small,
            ..MarinFactors::neutral()
        };
        assert_relative_eq!(small.size_factor(1.0, UnitSystem::Imperial).unwrap(), 0.879, max_relative = 1e-12);
        let large = MarinFactors {
            kb: SizeFactor::Large,
            ..MarinFactors::neutral()
        };
        assert_relative_eq!(large.size_factor(1.0, UnitSystem::Imperial).unwrap(), 0.91, max_relative = 1e-12);
    }

    #[test]
    fn test_auto_picks_by_threshold() {
        let auto = MarinFactors {
            kb: SizeFactor::Auto,
            ..MarinFactors::neutral()
        };
        let below = auto.size_factor(1.5, UnitSystem::Imperial).unwrap();
        let above = auto.size_factor(3.0, UnitSystem::Imperial).unwrap();
        assert_relative_eq!(below, 0.879 * 1.5f64.powf(SMALL_EXPONENT), max_relative = 1e-12);
        assert_relative_eq!(above, 0.91 * 3.0f64.powf(LARGE_EXPONENT), max_relative = 1e-12);
    }

    #[test]
    fn test_size_law_needs_positive_diameter() {
        let small = MarinFactors {
            kb: SizeFactor::Small,
            ..MarinFactors::neutral()
        };
        assert_eq!(
            small.size_factor(0.0, UnitSystem::Si).unwrap_err().error_code(),
            "DOMAIN_ERROR"
        );
    }

    #[test]
    fn test_depends_on_diameter() {
        let input = EnduranceInput::Marin {
            se_prime: 250.0,
            factors: MarinFactorInputs::default().with_size(SizeFactorMode::Auto),
        };
        assert!(input.resolve(UnitSystem::Si).unwrap().depends_on_diameter());
    }

    #[test]
    fn test_json_shape() {
        let input: EnduranceInput = serde_json::from_str(
            r#"{ "type": "Marin", "se_prime": 300.0, "factors": { "ka": "0.8", "size": "Auto" } }"#,
        )
        .unwrap();
        match input {
            EnduranceInput::Marin { factors, .. } => {
                assert_eq!(factors.size, SizeFactorMode::Auto);
                assert_eq!(factors.ka.as_deref(), Some("0.8"));
                assert_eq!(factors.kb, None);
            }
            _ => panic!("expected Marin"),
        }
    }
}
