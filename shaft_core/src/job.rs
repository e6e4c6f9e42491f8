//! # Shaft Jobs
//!
//! A `ShaftJob` describes one complete analysis: geometry, loads, where to
//! inspect the diagrams and which criteria to evaluate there. Jobs are plain
//! JSON, so they can be written by hand or produced by another program.
//!
//! ## Structure
//!
//! ```text
//! ShaftJob
//! ├── meta: JobMeta (label, engineer, timestamp)
//! ├── settings: AnalysisSettings (units, samples, solver)
//! ├── geometry + loads
//! ├── inspect_at: position of the critical section (default mid-span)
//! └── fatigue: criteria, FatigueInput, history_from_diagram
//! ```
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::job::{run, ShaftJob};
//!
//! let job = ShaftJob::example();
//! let json = job.to_json().unwrap();
//! let report = run(&ShaftJob::from_json(&json).unwrap()).unwrap();
//! assert_eq!(report.outcomes.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::ShaftAnalysis;
use crate::calculations::concentration::FatigueFactor;
use crate::calculations::criteria::{FailureCriterion, LoadHistory};
use crate::calculations::endurance::{EnduranceInput, MarinFactorInputs, SizeFactorMode};
use crate::calculations::fatigue::{CriterionOutcome, FatigueInput, SolveMode};
use crate::calculations::statics::{MomentField, MomentSample, ReactionSet};
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialInput;
use crate::session::{PointLoad, ShaftGeometry};
use crate::settings::AnalysisSettings;
use crate::units::UnitSystem;

/// Job header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMeta {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub engineer: String,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl Default for JobMeta {
    fn default() -> Self {
        JobMeta {
            label: String::new(),
            engineer: String::new(),
            created: Utc::now(),
        }
    }
}

fn all_criteria() -> Vec<FailureCriterion> {
    FailureCriterion::ALL.to_vec()
}

/// Criterion evaluation part of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueJob {
    /// Criteria to evaluate (default: all seven)
    #[serde(default = "all_criteria")]
    pub criteria: Vec<FailureCriterion>,
    pub input: FatigueInput,
    /// Replace `input.history` with the rotating-shaft history at `inspect_at`
    #[serde(default)]
    pub history_from_diagram: bool,
}

/// One complete analysis description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaftJob {
    #[serde(default)]
    pub meta: JobMeta,
    #[serde(default)]
    pub settings: AnalysisSettings,
    pub geometry: ShaftGeometry,
    pub loads: Vec<PointLoad>,
    #[serde(default)]
    pub inspect_at: Option<f64>,
    #[serde(default)]
    pub fatigue: Option<FatigueJob>,
    #[serde(default)]
    pub include_diagrams: bool,
}

impl ShaftJob {
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A small worked job: a gear and a pulley between two bearings.
    pub fn example() -> Self {
        ShaftJob {
            meta: JobMeta {
                label: "Countershaft".to_string(),
                engineer: String::new(),
                created: Utc::now(),
            },
            settings: AnalysisSettings::with_units(UnitSystem::Si),
            geometry: ShaftGeometry {
                length: 0.6,
                support_a: 0.05,
                support_b: 0.55,
            },
            loads: vec![
                PointLoad::new(-2400.0, 900.0, 0.2, 0.0, 0.1),
                PointLoad::new(0.0, -1600.0, 0.45, 0.15, 0.0),
            ],
            inspect_at: Some(0.2),
            fatigue: Some(FatigueJob {
                criteria: vec![FailureCriterion::AsmeElliptic],
                input: FatigueInput::new(
                    SolveMode::Diameter { safety_factor: 2.0 },
                    MaterialInput::catalog("SAE 1050 LF"),
                    LoadHistory::default(),
                )
                .with_endurance(EnduranceInput::Marin {
                    se_prime: 345.0,
                    factors: MarinFactorInputs {
                        ka: Some("0.77".to_string()),
                        ke: Some("0.814".to_string()),
                        size: SizeFactorMode::Auto,
                        ..MarinFactorInputs::default()
                    },
                })
                .with_factors(FatigueFactor::notch(1.7, 0.85), FatigueFactor::notch(1.5, 0.9)),
                history_from_diagram: true,
            }),
            include_diagrams: false,
        }
    }
}

/// Everything a job produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub analysis_id: Uuid,
    pub meta: JobMeta,
    pub units: UnitSystem,
    pub reactions: ReactionSet,
    pub max_abs_mh: f64,
    pub max_abs_mv: f64,
    pub max_abs_torque: f64,
    /// Sample with the largest resultant bending moment
    pub peak: MomentSample,
    /// Sample nearest to `inspect_at`
    pub inspected: MomentSample,
    /// History the criteria were evaluated with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<LoadHistory>,
    pub outcomes: Vec<CriterionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagrams: Option<MomentField>,
}

/// Run a job to completion. Session and statics errors abort the job;
/// criterion errors are collected per criterion.
pub fn run(job: &ShaftJob) -> CalcResult<JobReport> {
    job.settings.validate()?;
    let mut analysis = ShaftAnalysis::new(job.settings);
    let geometry = job.geometry;
    analysis.start(geometry.length, job.loads.len(), geometry.support_a, geometry.support_b)?;
    for (index, load) in job.loads.iter().enumerate() {
        analysis.set_load(index, *load)?;
    }

    let position = job
        .inspect_at
        .unwrap_or(geometry.support_a + geometry.span() / 2.0);
    if !(position.is_finite() && (0.0..=geometry.length).contains(&position)) {
        return Err(CalcError::invalid_input(
            "inspect_at",
            position.to_string(),
            format!("Inspection point must lie in [0, {}]", geometry.length),
        ));
    }

    let diagrams = analysis.solve_diagrams()?;
    let reactions = diagrams.reactions;
    let max_abs_mh = diagrams.max_abs_mh;
    let max_abs_mv = diagrams.max_abs_mv;
    let max_abs_torque = diagrams.field.max_abs_torque();
    let no_samples = || CalcError::domain("moment field", "Diagrams hold no samples");
    let peak = diagrams.field.max_resultant().ok_or_else(no_samples)?;
    let inspected = diagrams.field.sample_at(position).ok_or_else(no_samples)?;
    let field = job.include_diagrams.then(|| diagrams.field.clone());

    let mut history = None;
    let mut outcomes = Vec::new();
    if let Some(fatigue) = &job.fatigue {
        let mut input = fatigue.input.clone();
        if fatigue.history_from_diagram {
            input.history = LoadHistory::rotating_shaft(&inspected);
        }
        history = Some(input.history);
        for &criterion in &fatigue.criteria {
            let outcome = analysis
                .select_criterion(criterion)
                .and_then(|_| analysis.evaluate(&input).cloned());
            outcomes.push(CriterionOutcome::from_result(criterion, outcome));
        }
    }

    info!(
        "job '{}': {} criteria evaluated, {} failed",
        job.meta.label,
        outcomes.len(),
        outcomes.iter().filter(|o| !o.is_ok()).count()
    );

    Ok(JobReport {
        analysis_id: analysis.id(),
        meta: job.meta.clone(),
        units: job.settings.units,
        reactions,
        max_abs_mh,
        max_abs_mv,
        max_abs_torque,
        peak,
        inspected,
        history,
        outcomes,
        diagrams: field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_runs() {
        let report = run(&ShaftJob::example()).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        let outcome = &report.outcomes[0];
        let result = outcome.result.as_ref().unwrap();
        assert!((result.safety_factor - 2.0).abs() < 1e-6);
        assert!(result.diameter > 0.01 && result.diameter < 0.1);
        assert!(report.diagrams.is_none());
    }

    #[test]
    fn test_history_from_diagram() {
        let report = run(&ShaftJob::example()).unwrap();
        let history = report.history.unwrap();
        assert_eq!(history.ma, report.inspected.mr);
        assert_eq!(history.tm, report.inspected.mt.abs());
    }

    #[test]
    fn test_json_round_trip() {
        let job = ShaftJob::example();
        let parsed = ShaftJob::from_json(&job.to_json().unwrap()).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "geometry": { "length": 10.0, "support_a": 0.0, "support_b": 10.0 },
            "loads": [ { "fy": -100.0, "fz": 0.0, "rx": 5.0 } ],
            "include_diagrams": true
        }"#;
        let report = run(&ShaftJob::from_json(json).unwrap()).unwrap();
        assert!((report.reactions.a[1] - 50.0).abs() < 1e-9);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.diagrams.unwrap().len(), 1000);
    }

    #[test]
    fn test_criterion_errors_are_collected() {
        let mut job = ShaftJob::example();
        if let Some(fatigue) = job.fatigue.as_mut() {
            fatigue.criteria = vec![FailureCriterion::Goodman, FailureCriterion::Tresca];
            fatigue.input.material = MaterialInput::Custom {
                ultimate: None,
                yield_strength: Some(500.0),
            };
        }
        let report = run(&job).unwrap();
        assert!(!report.outcomes[0].is_ok());
        assert!(report.outcomes[1].is_ok());
    }

    #[test]
    fn test_inspection_outside_shaft() {
        let mut job = ShaftJob::example();
        job.inspect_at = Some(2.0);
        assert_eq!(run(&job).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bad_json() {
        assert_eq!(
            ShaftJob::from_json("{ not json").unwrap_err().error_code(),
            "SERIALIZATION_ERROR"
        );
    }
}
