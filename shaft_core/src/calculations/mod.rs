//! # Shaft Calculations
//!
//! Statics and fatigue calculations for a shaft on two bearings. Each
//! calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function returning `Result<*Result, CalcError>`
//!
//! ## Available Calculations
//!
//! - [`statics`] - Bearing reactions and Mh/Mv/Mt diagrams
//! - [`criteria`] - Closed-form safety factors of the seven failure criteria
//! - [`endurance`] - Endurance limit with Marin factors
//! - [`concentration`] - Fatigue stress-concentration factors
//! - [`solver`] - Bracketed log-space root search for the inverse solve
//! - [`fatigue`] - Forward and inverse criterion evaluation

pub mod concentration;
pub mod criteria;
pub mod endurance;
pub mod fatigue;
pub mod solver;
pub mod statics;

// Re-export commonly used types
pub use concentration::FatigueFactor;
pub use criteria::{FailureCriterion, LoadHistory};
pub use endurance::{EnduranceInput, MarinFactorInputs, SizeFactorMode};
pub use fatigue::{evaluate, evaluate_all, CriterionOutcome, FatigueInput, FatigueResult, SolveMode};
pub use statics::{DiagramResult, MomentField, MomentSample, ReactionSet};
