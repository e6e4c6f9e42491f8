//! # Unit Systems and Unit Types
//!
//! The engine works in one of two consistent unit systems, chosen per
//! analysis:
//!
//! | System   | Length | Force | Strength input | Moment | Stress in formulas |
//! |----------|--------|-------|----------------|--------|--------------------|
//! | SI       | m      | N     | MPa            | N·m    | Pa                 |
//! | Imperial | in     | lbf   | ksi            | lbf·in | psi                |
//!
//! Strengths are entered in MPa/ksi and multiplied by the stress scale factor
//! before they meet the section stresses. The length scale factor maps the
//! dimensionless root of the inverse solve back to a physical diameter.
//!
//! Newtype wrappers are provided for the SI ↔ imperial conversions a caller
//! needs to restate a scenario in the other system.
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::units::{Inches, Meters, UnitSystem};
//!
//! let d: Inches = Meters(0.0254).into();
//! assert!((d.0 - 1.0).abs() < 1e-12);
//! assert_eq!(UnitSystem::Imperial.stress_scale(), 1e3);
//! ```

use serde::{Deserialize, Serialize};

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;
/// Newtons per pound-force
pub const NEWTONS_PER_LBF: f64 = 4.448_221_615_260_5;
/// Megapascals per ksi
pub const MPA_PER_KSI: f64 = 6.894_757_293_168_361;

// ============================================================================
// Unit System
// ============================================================================

/// The unit system an analysis is carried out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    /// m, N, MPa
    #[default]
    Si,
    /// in, lbf, ksi
    Imperial,
}

/// Display labels for the active unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitLabels {
    pub length: &'static str,
    pub force: &'static str,
    pub stress: &'static str,
    pub moment: &'static str,
}

impl UnitSystem {
    /// All unit systems for UI selection
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Si, UnitSystem::Imperial];

    /// Scale from the dimensionless inverse-solve variable to a diameter
    pub fn length_scale(&self) -> f64 {
        match self {
            UnitSystem::Si => 1e-2,
            UnitSystem::Imperial => 1e-1,
        }
    }

    /// Scale from entered strength (MPa, ksi) to formula stress (Pa, psi)
    pub fn stress_scale(&self) -> f64 {
        match self {
            UnitSystem::Si => 1e6,
            UnitSystem::Imperial => 1e3,
        }
    }

    /// Unit labels for display
    pub fn labels(&self) -> UnitLabels {
        match self {
            UnitSystem::Si => UnitLabels {
                length: "m",
                force: "N",
                stress: "MPa",
                moment: "N·m",
            },
            UnitSystem::Imperial => UnitLabels {
                length: "in",
                force: "lbf",
                stress: "ksi",
                moment: "lbf·in",
            },
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SI" | "METRIC" => Some(UnitSystem::Si),
            "IMPERIAL" | "US" | "USCS" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitSystem::Si => write!(f, "SI"),
            UnitSystem::Imperial => write!(f, "Imperial"),
        }
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Meters> for Inches {
    fn from(m: Meters) -> Self {
        Inches(m.0 / METERS_PER_INCH)
    }
}

impl From<Inches> for Meters {
    fn from(inches: Inches) -> Self {
        Meters(inches.0 * METERS_PER_INCH)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in pounds-force
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoundsForce(pub f64);

impl From<Newtons> for PoundsForce {
    fn from(n: Newtons) -> Self {
        PoundsForce(n.0 / NEWTONS_PER_LBF)
    }
}

impl From<PoundsForce> for Newtons {
    fn from(lbf: PoundsForce) -> Self {
        Newtons(lbf.0 * NEWTONS_PER_LBF)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in newton-meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMeters(pub f64);

/// Moment in pound-force inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LbfInches(pub f64);

impl From<NewtonMeters> for LbfInches {
    fn from(nm: NewtonMeters) -> Self {
        LbfInches(nm.0 / (NEWTONS_PER_LBF * METERS_PER_INCH))
    }
}

impl From<LbfInches> for NewtonMeters {
    fn from(lbf_in: LbfInches) -> Self {
        NewtonMeters(lbf_in.0 * NEWTONS_PER_LBF * METERS_PER_INCH)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mpa(pub f64);

/// Stress in kips per square inch (ksi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

impl From<Mpa> for Ksi {
    fn from(mpa: Mpa) -> Self {
        Ksi(mpa.0 / MPA_PER_KSI)
    }
}

impl From<Ksi> for Mpa {
    fn from(ksi: Ksi) -> Self {
        Mpa(ksi.0 * MPA_PER_KSI)
    }
}

macro_rules! impl_value {
    ($($unit:ty),*) => {
        $(impl $unit {
            /// Magnitude in this unit
            pub fn value(self) -> f64 {
                self.0
            }
        })*
    };
}

impl_value!(Meters, Inches, Newtons, PoundsForce, NewtonMeters, LbfInches, Mpa, Ksi);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_inches() {
        let inches: Inches = Meters(1.0).into();
        assert!((inches.0 - 39.370_078_740_157_48).abs() < 1e-9);
    }

    #[test]
    fn test_moment_roundtrip() {
        let m = NewtonMeters(250.0);
        let back: NewtonMeters = LbfInches::from(m).into();
        assert!((back.0 - 250.0).abs() < 1e-9);
        // 1 lbf·in ≈ 0.112985 N·m
        let one: NewtonMeters = LbfInches(1.0).into();
        assert!((one.0 - 0.112_984_829).abs() < 1e-8);
    }

    #[test]
    fn test_ksi_to_mpa() {
        let mpa: Mpa = Ksi(1.0).into();
        assert!((mpa.0 - 6.894_757).abs() < 1e-6);
    }

    #[test]
    fn test_scale_factors() {
        assert_eq!(UnitSystem::Si.length_scale(), 1e-2);
        assert_eq!(UnitSystem::Si.stress_scale(), 1e6);
        assert_eq!(UnitSystem::Imperial.length_scale(), 1e-1);
        assert_eq!(UnitSystem::Imperial.stress_scale(), 1e3);
        assert_eq!(UnitSystem::Imperial.labels().moment, "lbf·in");
    }

    #[test]
    fn test_value_after_conversion() {
        assert_eq!(Meters(0.3).value(), 0.3);
        assert!((Inches::from(Meters(0.0254)).value() - 1.0).abs() < 1e-12);
        assert!((PoundsForce::from(Newtons(4.448_221_615_260_5)).value() - 1.0).abs() < 1e-12);
        assert!((Mpa::from(Ksi(100.0)).value() - 689.475_729).abs() < 1e-5);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"Imperial\"");
        let roundtrip: UnitSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, UnitSystem::Imperial);

        let mpa = Mpa(470.0);
        assert_eq!(serde_json::to_string(&mpa).unwrap(), "470.0");
    }

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(UnitSystem::from_str_flexible(" si "), Some(UnitSystem::Si));
        assert_eq!(UnitSystem::from_str_flexible("imperial"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_str_flexible("furlongs"), None);
    }
}
