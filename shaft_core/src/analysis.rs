//! # Shaft Analysis
//!
//! One analysis owns one load session, its solved diagrams, the selected
//! failure criterion and the last evaluation. Progress is exposed as an
//! [`AnalysisState`]:
//!
//! ```text
//! Uninitialized ─start─▶ Accumulating ─last load─▶ Complete
//!                              ▲                      │
//!                              └──── start ───────────┤ select_criterion
//!                                                     ▼
//!                         Evaluated ◀─evaluate─ CriterionSelected
//! ```
//!
//! `start` discards everything downstream. Writing a load discards the solved
//! diagrams and the last evaluation. A failed evaluation leaves the analysis
//! at `CriterionSelected`.
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::analysis::{AnalysisState, ShaftAnalysis};
//! use shaft_core::settings::AnalysisSettings;
//!
//! let mut analysis = ShaftAnalysis::new(AnalysisSettings::default());
//! analysis.start(1.0, 2, 0.0, 1.0).unwrap();
//! analysis.add_load(0, -500.0, 0.0, 0.3, 0.0, 0.0).unwrap();
//! assert_eq!(analysis.state(), AnalysisState::Accumulating { supplied: 1, expected: 2 });
//!
//! analysis.add_load(1, 0.0, 800.0, 0.7, 0.05, 0.0).unwrap();
//! assert_eq!(analysis.state(), AnalysisState::Complete);
//!
//! let diagrams = analysis.solve_diagrams().unwrap();
//! assert_eq!(diagrams.field.len(), 1000);
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::criteria::FailureCriterion;
use crate::calculations::fatigue::{self, FatigueInput, FatigueResult};
use crate::calculations::statics::{self, DiagramResult, MomentSample};
use crate::errors::{CalcError, CalcResult};
use crate::session::{LoadSession, PointLoad};
use crate::settings::AnalysisSettings;

/// Where an analysis stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum AnalysisState {
    Uninitialized,
    Accumulating { supplied: usize, expected: usize },
    Complete,
    CriterionSelected,
    Evaluated,
}

/// A single shaft analysis.
#[derive(Debug, Clone)]
pub struct ShaftAnalysis {
    id: Uuid,
    settings: AnalysisSettings,
    session: Option<LoadSession>,
    diagrams: Option<DiagramResult>,
    criterion: Option<FailureCriterion>,
    result: Option<FatigueResult>,
}

impl Default for ShaftAnalysis {
    fn default() -> Self {
        ShaftAnalysis::new(AnalysisSettings::default())
    }
}

impl ShaftAnalysis {
    pub fn new(settings: AnalysisSettings) -> Self {
        ShaftAnalysis {
            id: Uuid::new_v4(),
            settings,
            session: None,
            diagrams: None,
            criterion: None,
            result: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn state(&self) -> AnalysisState {
        match &self.session {
            None => AnalysisState::Uninitialized,
            Some(session) if !session.is_complete() => AnalysisState::Accumulating {
                supplied: session.loads_supplied(),
                expected: session.load_count(),
            },
            Some(_) => match (self.criterion, &self.result) {
                (None, _) => AnalysisState::Complete,
                (Some(_), None) => AnalysisState::CriterionSelected,
                (Some(_), Some(_)) => AnalysisState::Evaluated,
            },
        }
    }

    /// Start a new load session, discarding any previous one.
    pub fn start(&mut self, length: f64, load_count: usize, support_a: f64, support_b: f64) -> CalcResult<()> {
        let session = LoadSession::start(length, load_count, support_a, support_b)?;
        debug!("analysis {}: new session with {} load slots", self.id, load_count);
        self.session = Some(session);
        self.diagrams = None;
        self.criterion = None;
        self.result = None;
        Ok(())
    }

    /// Write load slot `index`.
    pub fn add_load(&mut self, index: usize, fy: f64, fz: f64, rx: f64, ry: f64, rz: f64) -> CalcResult<()> {
        self.set_load(index, PointLoad::new(fy, fz, rx, ry, rz))
    }

    /// Write load slot `index` from a [`PointLoad`].
    pub fn set_load(&mut self, index: usize, load: PointLoad) -> CalcResult<()> {
        let session = self.session.as_mut().ok_or_else(not_started)?;
        session.set_load(index, load)?;
        self.diagrams = None;
        self.result = None;
        Ok(())
    }

    pub fn session(&self) -> Option<&LoadSession> {
        self.session.as_ref()
    }

    /// Solve the diagrams of the complete session, reusing a previous solve.
    pub fn solve_diagrams(&mut self) -> CalcResult<&DiagramResult> {
        let session = self.session.as_ref().ok_or_else(not_started)?;
        let diagrams = match self.diagrams.take() {
            Some(diagrams) => diagrams,
            None => statics::solve(session, self.settings.sample_count)?,
        };
        Ok(self.diagrams.insert(diagrams))
    }

    /// Solved diagrams, if any
    pub fn diagrams(&self) -> Option<&DiagramResult> {
        self.diagrams.as_ref()
    }

    /// Diagram values at the sample nearest to `position`, solving first if needed.
    pub fn inspect(&mut self, position: f64) -> CalcResult<MomentSample> {
        self.solve_diagrams()?
            .field
            .sample_at(position)
            .ok_or_else(|| CalcError::domain("moment field", "Diagrams hold no samples"))
    }

    /// Choose the criterion for the next evaluation.
    pub fn select_criterion(&mut self, criterion: FailureCriterion) -> CalcResult<()> {
        let session = self.session.as_ref().ok_or_else(not_started)?;
        if !session.is_complete() {
            return Err(CalcError::invalid_input(
                "criterion",
                criterion.display_name(),
                format!(
                    "Load session is incomplete ({}/{} loads)",
                    session.loads_supplied(),
                    session.load_count()
                ),
            ));
        }
        self.criterion = Some(criterion);
        self.result = None;
        Ok(())
    }

    pub fn criterion(&self) -> Option<FailureCriterion> {
        self.criterion
    }

    /// Evaluate the selected criterion.
    pub fn evaluate(&mut self, input: &FatigueInput) -> CalcResult<&FatigueResult> {
        let criterion = self
            .criterion
            .ok_or_else(|| CalcError::missing_field("criterion"))?;
        self.result = None;
        let result = fatigue::evaluate(criterion, input, &self.settings)?;
        info!(
            "analysis {}: {} evaluated, CS = {:.3}",
            self.id, criterion, result.safety_factor
        );
        Ok(self.result.insert(result))
    }

    /// Last successful evaluation
    pub fn result(&self) -> Option<&FatigueResult> {
        self.result.as_ref()
    }
}

fn not_started() -> CalcError {
    CalcError::invalid_input("session", "none", "No load session has been started")
}
