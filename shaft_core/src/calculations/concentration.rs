//! Fatigue stress-concentration factors.
//!
//! The bending (Kff) and torsion (Kfs) factors are entered directly or
//! derived from the geometric factor Kt and the notch sensitivity q:
//!
//! ```text
//! Kf = 1 + q·(Kt − 1)
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Fatigue stress-concentration factor as entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FatigueFactor {
    /// Kf given directly
    Direct { kf: f64 },
    /// Kf derived from Kt and q; either may be left blank
    Notch {
        #[serde(default)]
        kt: Option<f64>,
        #[serde(default)]
        q: Option<f64>,
    },
}

impl Default for FatigueFactor {
    fn default() -> Self {
        FatigueFactor::Direct { kf: 1.0 }
    }
}

impl FatigueFactor {
    /// Derived factor from Kt and q
    pub fn notch(kt: f64, q: f64) -> Self {
        FatigueFactor::Notch {
            kt: Some(kt),
            q: Some(q),
        }
    }

    /// Resolve to a numeric Kf. `Ok(None)` when the notch data is incomplete.
    pub fn resolve(&self) -> CalcResult<Option<f64>> {
        match *self {
            FatigueFactor::Direct { kf } => {
                if !(kf.is_finite() && kf > 0.0) {
                    return Err(CalcError::invalid_input(
                        "kf",
                        kf.to_string(),
                        "Concentration factor must be positive",
                    ));
                }
                Ok(Some(kf))
            }
            FatigueFactor::Notch { kt, q } => match (kt, q) {
                (Some(kt), Some(q)) => notch_factor(kt, q).map(Some),
                _ => Ok(None),
            },
        }
    }

    /// Resolve, reporting incomplete notch data as a missing `field`.
    pub fn require(&self, field: &str) -> CalcResult<f64> {
        self.resolve()?
            .ok_or_else(|| CalcError::missing_field(field))
    }
}

/// Kf = 1 + q·(Kt − 1), with `q ∈ [0, 1]` and `Kt ≥ 1`.
pub fn notch_factor(kt: f64, q: f64) -> CalcResult<f64> {
    if !(q.is_finite() && (0.0..=1.0).contains(&q)) {
        return Err(CalcError::invalid_input(
            "q",
            q.to_string(),
            "Notch sensitivity must lie in [0, 1]",
        ));
    }
    if !(kt.is_finite() && kt >= 1.0) {
        return Err(CalcError::invalid_input(
            "kt",
            kt.to_string(),
            "Geometric concentration factor must be at least 1",
        ));
    }
    Ok(1.0 + q * (kt - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_notch_factor() {
        assert!(approx_eq(notch_factor(2.0, 0.8).unwrap(), 1.8, 1e-12));
        assert_eq!(notch_factor(2.5, 0.0).unwrap(), 1.0);
        assert_eq!(notch_factor(2.5, 1.0).unwrap(), 2.5);
    }

    #[test]
    fn test_notch_limits() {
        assert!(notch_factor(2.0, 1.2).is_err());
        assert!(notch_factor(2.0, -0.1).is_err());
        assert!(notch_factor(0.9, 0.5).is_err());
    }

    #[test]
    fn test_blank_notch_is_missing() {
        let factor = FatigueFactor::Notch {
            kt: Some(1.7),
            q: None,
        };
        assert_eq!(factor.resolve().unwrap(), None);
        assert_eq!(factor.require("kff").unwrap_err(), CalcError::missing_field("kff"));
    }

    #[test]
    fn test_default_is_unity() {
        assert_eq!(FatigueFactor::default().require("kfs").unwrap(), 1.0);
        assert!(FatigueFactor::Direct { kf: 0.0 }.resolve().is_err());
    }

    #[test]
    fn test_json_shape() {
        let factor: FatigueFactor =
            serde_json::from_str(r#"{ "type": "Notch", "kt": 2.2, "q": 0.85 }"#).unwrap();
        assert!(approx_eq(factor.require("kff").unwrap(), 2.02, 1e-12));
    }
}
