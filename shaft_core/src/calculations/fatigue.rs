//! # Shaft Fatigue Evaluation
//!
//! Runs one failure criterion on a complete set of inputs, either forward
//! (diameter known, safety factor computed) or inverse (target safety
//! factor, diameter solved for).
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::calculations::criteria::{FailureCriterion, LoadHistory};
//! use shaft_core::calculations::endurance::EnduranceInput;
//! use shaft_core::calculations::fatigue::{evaluate, FatigueInput, SolveMode};
//! use shaft_core::materials::MaterialInput;
//! use shaft_core::settings::AnalysisSettings;
//!
//! let input = FatigueInput::new(
//!     SolveMode::Diameter { safety_factor: 2.0 },
//!     MaterialInput::catalog("SAE 1045 LF"),
//!     LoadHistory::new(120.0, 0.0, 0.0, 90.0),
//! )
//! .with_endurance(EnduranceInput::Direct { se: 220.0 });
//!
//! let result = evaluate(FailureCriterion::Goodman, &input, &AnalysisSettings::default()).unwrap();
//! assert!((result.safety_factor - 2.0).abs() < 1e-6);
//! println!("d = {:.1} mm", result.diameter * 1000.0);
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::concentration::FatigueFactor;
use super::criteria::{equivalent_stresses, safety_factor, FailureCriterion, LoadHistory, Strengths};
use super::endurance::{EnduranceInput, EnduranceModel};
use super::solver::solve_positive;
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialInput;
use crate::settings::AnalysisSettings;

/// Which quantity is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolveMode {
    /// Diameter known, safety factor computed
    SafetyFactor { diameter: f64 },
    /// Safety factor known, diameter computed
    Diameter { safety_factor: f64 },
}

/// Everything one criterion evaluation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueInput {
    pub mode: SolveMode,
    pub material: MaterialInput,
    /// Not needed by the static criteria
    #[serde(default)]
    pub endurance: Option<EnduranceInput>,
    /// Kff
    #[serde(default)]
    pub bending_factor: FatigueFactor,
    /// Kfs
    #[serde(default)]
    pub torsion_factor: FatigueFactor,
    #[serde(default)]
    pub history: LoadHistory,
}

impl FatigueInput {
    /// Input with unit concentration factors and no endurance limit
    pub fn new(mode: SolveMode, material: MaterialInput, history: LoadHistory) -> Self {
        FatigueInput {
            mode,
            material,
            endurance: None,
            bending_factor: FatigueFactor::default(),
            torsion_factor: FatigueFactor::default(),
            history,
        }
    }

    pub fn with_endurance(mut self, endurance: EnduranceInput) -> Self {
        self.endurance = Some(endurance);
        self
    }

    pub fn with_factors(mut self, bending: FatigueFactor, torsion: FatigueFactor) -> Self {
        self.bending_factor = bending;
        self.torsion_factor = torsion;
        self
    }

    pub fn with_history(mut self, history: LoadHistory) -> Self {
        self.history = history;
        self
    }
}

/// Outcome of one successful evaluation. Stresses and strengths are in MPa or
/// ksi, the diameter in m or in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueResult {
    pub criterion: FailureCriterion,
    pub mode: SolveMode,
    pub safety_factor: f64,
    pub diameter: f64,
    /// Se at the final diameter; `None` for the static criteria
    pub endurance_limit: Option<f64>,
    /// True when malformed Marin factors were replaced by 1
    pub neutral_fallback: bool,
    pub kff: f64,
    pub kfs: f64,
    /// Equivalent alternating stress σ'a
    pub sigma_a_eq: f64,
    /// Equivalent mean stress σ'm
    pub sigma_m_eq: f64,
    /// Root-finder iterations (0 for a forward evaluation)
    pub iterations: usize,
}

/// Result or error of one criterion in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionOutcome {
    pub criterion: FailureCriterion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FatigueResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CalcError>,
}

impl CriterionOutcome {
    pub fn from_result(criterion: FailureCriterion, outcome: CalcResult<FatigueResult>) -> Self {
        match outcome {
            Ok(result) => CriterionOutcome {
                criterion,
                result: Some(result),
                error: None,
            },
            Err(error) => CriterionOutcome {
                criterion,
                result: None,
                error: Some(error),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

/// Evaluate one criterion.
pub fn evaluate(
    criterion: FailureCriterion,
    input: &FatigueInput,
    settings: &AnalysisSettings,
) -> CalcResult<FatigueResult> {
    settings.validate()?;
    input.history.validate()?;

    let units = settings.units;
    let scale = units.stress_scale();
    let material = input.material.resolve(units)?;
    let kff = input.bending_factor.require("kff")?;
    let kfs = input.torsion_factor.require("kfs")?;

    let endurance: Option<EnduranceModel> = if criterion.requirements().endurance {
        let entered = input
            .endurance
            .as_ref()
            .ok_or_else(|| CalcError::missing_field("endurance_limit"))?;
        Some(entered.resolve(units)?)
    } else {
        None
    };

    let cs_at = |diameter: f64| -> CalcResult<f64> {
        let strengths = Strengths {
            endurance: endurance
                .as_ref()
                .map(|model| model.at(diameter))
                .transpose()?
                .map(|se| se * scale),
            ultimate: material.ultimate.map(|su| su * scale),
            yield_strength: material.yield_strength.map(|sy| sy * scale),
        };
        safety_factor(criterion, diameter, &strengths, kff, kfs, &input.history)
    };

    let (diameter, cs, iterations) = match input.mode {
        SolveMode::SafetyFactor { diameter } => (diameter, cs_at(diameter)?, 0),
        SolveMode::Diameter { safety_factor: target } => {
            if !(target.is_finite() && target > 0.0) {
                return Err(CalcError::invalid_input(
                    "safety_factor",
                    target.to_string(),
                    "Target safety factor must be positive",
                ));
            }
            let length_scale = units.length_scale();
            let ln_target = target.ln();
            let root = solve_positive(|u| Ok(cs_at(u * length_scale)?.ln() - ln_target), &settings.solver)?;
            let diameter = root.value * length_scale;
            debug!(
                "{}: diameter {:.6e} after {} iterations",
                criterion, diameter, root.iterations
            );
            (diameter, cs_at(diameter)?, root.iterations)
        }
    };

    let (sigma_a, sigma_m) = equivalent_stresses(diameter, kff, kfs, &input.history);
    let result = FatigueResult {
        criterion,
        mode: input.mode,
        safety_factor: cs,
        diameter,
        endurance_limit: endurance.as_ref().map(|model| model.at(diameter)).transpose()?,
        neutral_fallback: endurance.as_ref().is_some_and(|model| model.neutral_fallback()),
        kff,
        kfs,
        sigma_a_eq: sigma_a / scale,
        sigma_m_eq: sigma_m / scale,
        iterations,
    };
    info!(
        "{}: CS = {:.4}, d = {:.6} {}",
        criterion,
        result.safety_factor,
        result.diameter,
        units.labels().length
    );
    Ok(result)
}

/// Evaluate the listed criteria, collecting each outcome.
pub fn evaluate_many(
    criteria: &[FailureCriterion],
    input: &FatigueInput,
    settings: &AnalysisSettings,
) -> Vec<CriterionOutcome> {
    criteria
        .iter()
        .map(|&criterion| CriterionOutcome::from_result(criterion, evaluate(criterion, input, settings)))
        .collect()
}

/// Evaluate all seven criteria.
pub fn evaluate_all(input: &FatigueInput, settings: &AnalysisSettings) -> Vec<CriterionOutcome> {
    evaluate_many(&FailureCriterion::ALL, input, settings)
}
