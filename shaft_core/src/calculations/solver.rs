//! Bracketed root finding for positive unknowns.
//!
//! The unknown is searched in log space, `v = ln u`, between the bracket of
//! [`SolverSettings`], with `russell_lab`'s Brent method. The residual must
//! change sign across the bracket.
//!
//! ```rust
//! use shaft_core::calculations::solver::solve_positive;
//! use shaft_core::settings::SolverSettings;
//!
//! // u³ = 8
//! let root = solve_positive(|u| Ok((u.powi(3) / 8.0).ln()), &SolverSettings::default()).unwrap();
//! assert!((root.value - 2.0).abs() < 1e-9);
//! ```

use log::debug;
use russell_lab::{RootFinder, StrError};
use serde::Serialize;

use crate::errors::{CalcError, CalcResult};
use crate::settings::SolverSettings;

/// Evaluations spent on the two bracket ends
const BRACKET_EVALUATIONS: usize = 2;

/// Converged root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Root {
    /// Root in the caller's scaled variable `u`
    pub value: f64,
    /// Brent iterations used
    pub iterations: usize,
}

/// Bookkeeping carried through the root finder.
#[derive(Debug, Default)]
struct Tally {
    evaluations: usize,
    last_residual: Option<f64>,
    failure: Option<CalcError>,
}

impl Tally {
    fn iterations(&self) -> usize {
        self.evaluations.saturating_sub(BRACKET_EVALUATIONS)
    }
}

/// Find `u > 0` with `residual(u) = 0` inside `[settings.lower, settings.upper]`.
///
/// Errors raised by `residual` propagate unchanged. A bracket without a sign
/// change, a non-finite residual or an exhausted iteration budget is
/// `ConvergenceFailed`.
pub fn solve_positive<F>(mut residual: F, settings: &SolverSettings) -> CalcResult<Root>
where
    F: FnMut(f64) -> CalcResult<f64>,
{
    settings.validate()?;
    let budget = settings.max_iterations + BRACKET_EVALUATIONS;
    let mut tally = Tally::default();

    let solver = RootFinder::new();
    let found = solver.brent(
        settings.lower.ln(),
        settings.upper.ln(),
        &mut tally,
        |v, tally: &mut Tally| -> Result<f64, StrError> {
            if tally.evaluations >= budget {
                return Err("iteration budget exhausted");
            }
            tally.evaluations += 1;
            let r = match residual(v.exp()) {
                Ok(r) => r,
                Err(e) => {
                    tally.failure = Some(e);
                    return Err("residual failed");
                }
            };
            if !r.is_finite() {
                return Err("non-finite residual");
            }
            tally.last_residual = Some(r);
            debug!("brent: eval {} u={:.6e} residual={:.3e}", tally.evaluations, v.exp(), r);
            Ok(r)
        },
    );

    match found {
        Ok((v, _)) => Ok(Root {
            value: v.exp(),
            iterations: tally.iterations(),
        }),
        Err(message) => {
            debug!("brent: {}", message);
            match tally.failure.take() {
                Some(e) => Err(e),
                None => Err(CalcError::convergence_failed(tally.iterations(), tally.last_residual)),
            }
        }
    }
}
