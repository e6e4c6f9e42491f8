//! # Failure Criteria
//!
//! Closed-form safety factors for a solid round shaft of diameter `d` under
//! bending and torsion. Four fatigue criteria combine alternating and mean
//! stresses against the endurance limit; three static criteria compare the
//! peak stress against yield.
//!
//! ## Stresses
//!
//! ```text
//! σa = 32·Kff·Ma/(π d³)    σm = 32·Kff·Mm/(π d³)
//! τa = 16·Kfs·Ta/(π d³)    τm = 16·Kfs·Tm/(π d³)
//! σ'a = √(σa² + 3τa²)      σ'm = √(σm² + 3τm²)
//! A = √(4(Kff·Ma)² + 3(Kfs·Ta)²)    B = √(4(Kff·Mm)² + 3(Kfs·Tm)²)
//! ```
//!
//! | Criterion     | Safety factor                                              |
//! |---------------|------------------------------------------------------------|
//! | Goodman       | Se·Su / (σ'a·Su + Se·σ'm)                                  |
//! | Gerber        | π d³ Se / (8A (1 + √(1 + (2B·Se/(A·Su))²)))               |
//! | ASME-Elliptic | π d³ / (16 √(4(Kff Ma/Se)² + 3(Kfs Ta/Se)² + 4(Kff Mm/Sy)² + 3(Kfs Tm/Sy)²)) |
//! | Soderberg     | π d³ / (16 (A/Se + B/Sy))                                  |
//! | Langer        | Sy / √(σmax² + 3τmax²)                                     |
//! | von Mises     | Sy / √(σmax² + 3τmax²)                                     |
//! | Tresca        | Sy / (2 √((σmax/2)² + τmax²))                              |
//!
//! Strengths are in Pa (SI) or psi (imperial), moments in N·m or lbf·in and
//! the diameter in m or in.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::calculations::statics::MomentSample;
use crate::errors::{CalcError, CalcResult};

/// Failure criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureCriterion {
    /// Modified Goodman line between Se and Su
    Goodman,
    /// Gerber parabola between Se and Su
    Gerber,
    /// ASME elliptic curve between Se and Sy
    AsmeElliptic,
    /// Soderberg line between Se and Sy
    Soderberg,
    /// First-cycle yield on the peak stresses
    Langer,
    /// Distortion energy on the peak stresses
    VonMises,
    /// Maximum shear stress on the peak stresses
    Tresca,
}

/// Strength data a criterion needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    /// Endurance limit Se
    pub endurance: bool,
    /// Ultimate tensile strength Su
    pub ultimate: bool,
    /// Yield strength Sy
    pub yield_strength: bool,
}

impl FailureCriterion {
    pub const ALL: [FailureCriterion; 7] = [
        FailureCriterion::Goodman,
        FailureCriterion::Gerber,
        FailureCriterion::AsmeElliptic,
        FailureCriterion::Soderberg,
        FailureCriterion::Langer,
        FailureCriterion::VonMises,
        FailureCriterion::Tresca,
    ];

    /// Name as shown in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            FailureCriterion::Goodman => "Goodman",
            FailureCriterion::Gerber => "Gerber",
            FailureCriterion::AsmeElliptic => "ASME-Elliptic",
            FailureCriterion::Soderberg => "Soderberg",
            FailureCriterion::Langer => "Langer",
            FailureCriterion::VonMises => "von Mises",
            FailureCriterion::Tresca => "Tresca",
        }
    }

    /// Parse from a loose name ("asme", "Von-Mises", "tresca", ...)
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "goodman" => Some(FailureCriterion::Goodman),
            "gerber" => Some(FailureCriterion::Gerber),
            "asme" | "asmeelliptic" | "elliptic" => Some(FailureCriterion::AsmeElliptic),
            "soderberg" => Some(FailureCriterion::Soderberg),
            "langer" => Some(FailureCriterion::Langer),
            "vonmises" | "mises" => Some(FailureCriterion::VonMises),
            "tresca" => Some(FailureCriterion::Tresca),
            _ => None,
        }
    }

    /// True for the yield-only criteria
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            FailureCriterion::Langer | FailureCriterion::VonMises | FailureCriterion::Tresca
        )
    }

    /// Strengths that must be resolved before the criterion can run.
    /// Missing ones are reported as `MissingField`.
    pub fn requirements(&self) -> Requirements {
        match self {
            FailureCriterion::Goodman | FailureCriterion::Gerber => Requirements {
                endurance: true,
                ultimate: true,
                yield_strength: false,
            },
            FailureCriterion::AsmeElliptic | FailureCriterion::Soderberg => Requirements {
                endurance: true,
                ultimate: false,
                yield_strength: true,
            },
            _ => Requirements {
                endurance: false,
                ultimate: false,
                yield_strength: true,
            },
        }
    }
}

impl std::fmt::Display for FailureCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Alternating and mean bending moments and torques, with optional peaks.
///
/// When `mmax`/`tmax` are absent the static criteria use `|Ma| + |Mm|` and
/// `|Ta| + |Tm|`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadHistory {
    pub ma: f64,
    pub mm: f64,
    pub ta: f64,
    pub tm: f64,
    pub mmax: Option<f64>,
    pub tmax: Option<f64>,
}

impl LoadHistory {
    pub fn new(ma: f64, mm: f64, ta: f64, tm: f64) -> Self {
        LoadHistory {
            ma,
            mm,
            ta,
            tm,
            mmax: None,
            tmax: None,
        }
    }

    /// Same history with explicit peak moment and torque
    pub fn with_peaks(mut self, mmax: f64, tmax: f64) -> Self {
        self.mmax = Some(mmax);
        self.tmax = Some(tmax);
        self
    }

    /// Rotating shaft at a diagram sample: fully reversed bending, steady torque.
    pub fn rotating_shaft(sample: &MomentSample) -> Self {
        let torque = sample.mt.abs();
        LoadHistory::new(sample.mr, 0.0, 0.0, torque).with_peaks(sample.mr, torque)
    }

    /// Steady moment and torque only
    pub fn static_only(moment: f64, torque: f64) -> Self {
        LoadHistory::new(0.0, moment, 0.0, torque).with_peaks(moment, torque)
    }

    /// Peak bending moment
    pub fn peak_moment(&self) -> f64 {
        self.mmax.unwrap_or(self.ma.abs() + self.mm.abs())
    }

    /// Peak torque
    pub fn peak_torque(&self) -> f64 {
        self.tmax.unwrap_or(self.ta.abs() + self.tm.abs())
    }

    pub fn validate(&self) -> CalcResult<()> {
        let values = [
            ("ma", Some(self.ma)),
            ("mm", Some(self.mm)),
            ("ta", Some(self.ta)),
            ("tm", Some(self.tm)),
            ("mmax", self.mmax),
            ("tmax", self.tmax),
        ];
        for (field, value) in values {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CalcError::invalid_input(field, v.to_string(), "Value must be finite"));
                }
            }
        }
        Ok(())
    }
}

/// Strengths in Pa or psi. Absent values are reported only if a criterion needs them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Strengths {
    pub endurance: Option<f64>,
    pub ultimate: Option<f64>,
    pub yield_strength: Option<f64>,
}

fn require_positive(field: &str, value: Option<f64>) -> CalcResult<f64> {
    let v = value.ok_or_else(|| CalcError::missing_field(field))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CalcError::domain(field, format!("Strength must be positive, got {}", v)));
    }
    Ok(v)
}

/// von Mises equivalent alternating and mean stresses `(σ'a, σ'm)`
pub fn equivalent_stresses(diameter: f64, kff: f64, kfs: f64, history: &LoadHistory) -> (f64, f64) {
    let z = PI * diameter.powi(3);
    let sigma_a = 32.0 * kff * history.ma / z;
    let sigma_m = 32.0 * kff * history.mm / z;
    let tau_a = 16.0 * kfs * history.ta / z;
    let tau_m = 16.0 * kfs * history.tm / z;
    (
        (sigma_a.powi(2) + 3.0 * tau_a.powi(2)).sqrt(),
        (sigma_m.powi(2) + 3.0 * tau_m.powi(2)).sqrt(),
    )
}

/// Safety factor of `criterion` at `diameter`.
pub fn safety_factor(
    criterion: FailureCriterion,
    diameter: f64,
    strengths: &Strengths,
    kff: f64,
    kfs: f64,
    history: &LoadHistory,
) -> CalcResult<f64> {
    if !(diameter.is_finite() && diameter > 0.0) {
        return Err(CalcError::domain(
            "diameter",
            format!("Diameter must be positive, got {}", diameter),
        ));
    }
    let needs = criterion.requirements();
    let se = if needs.endurance {
        require_positive("endurance_limit", strengths.endurance)?
    } else {
        0.0
    };
    let su = if needs.ultimate {
        require_positive("ultimate", strengths.ultimate)?
    } else {
        0.0
    };
    let sy = if needs.yield_strength {
        require_positive("yield_strength", strengths.yield_strength)?
    } else {
        0.0
    };

    let z = PI * diameter.powi(3);
    let big_a = (4.0 * (kff * history.ma).powi(2) + 3.0 * (kfs * history.ta).powi(2)).sqrt();
    let big_b = (4.0 * (kff * history.mm).powi(2) + 3.0 * (kfs * history.tm).powi(2)).sqrt();

    let cs = match criterion {
        FailureCriterion::Goodman => {
            let (sa, sm) = equivalent_stresses(diameter, kff, kfs, history);
            ratio(criterion, se * su, sa * su + se * sm)?
        }
        FailureCriterion::Gerber => {
            if big_a == 0.0 {
                return Err(CalcError::domain(
                    criterion.display_name(),
                    "Gerber needs a non-zero alternating load",
                ));
            }
            let term = 2.0 * big_b * se / (big_a * su);
            ratio(criterion, z * se, 8.0 * big_a * (1.0 + (1.0 + term * term).sqrt()))?
        }
        FailureCriterion::AsmeElliptic => {
            let sum = 4.0 * (kff * history.ma / se).powi(2)
                + 3.0 * (kfs * history.ta / se).powi(2)
                + 4.0 * (kff * history.mm / sy).powi(2)
                + 3.0 * (kfs * history.tm / sy).powi(2);
            ratio(criterion, z, 16.0 * sum.sqrt())?
        }
        FailureCriterion::Soderberg => ratio(criterion, z, 16.0 * (big_a / se + big_b / sy))?,
        FailureCriterion::Langer | FailureCriterion::VonMises => {
            let sigma = 32.0 * kff * history.peak_moment() / z;
            let tau = 16.0 * kfs * history.peak_torque() / z;
            ratio(criterion, sy, (sigma.powi(2) + 3.0 * tau.powi(2)).sqrt())?
        }
        FailureCriterion::Tresca => {
            let half_sigma = 16.0 * kff * history.peak_moment() / z;
            let tau = 16.0 * kfs * history.peak_torque() / z;
            ratio(criterion, sy, 2.0 * (half_sigma.powi(2) + tau.powi(2)).sqrt())?
        }
    };
    Ok(cs)
}

/// `numerator / denominator`, rejecting anything that is not a positive finite number
fn ratio(criterion: FailureCriterion, numerator: f64, denominator: f64) -> CalcResult<f64> {
    if !(denominator.is_finite() && denominator > 0.0) {
        return Err(CalcError::domain(
            criterion.display_name(),
            format!("Denominator is {}; the shaft carries no effective load", denominator),
        ));
    }
    let cs = numerator / denominator;
    if !(cs.is_finite() && cs > 0.0) {
        return Err(CalcError::domain(
            criterion.display_name(),
            format!("Safety factor evaluates to {}", cs),
        ));
    }
    Ok(cs)
}
