//! # shaft_core - Shaft Statics and Fatigue Engine
//!
//! `shaft_core` sizes and checks a solid round shaft carried by two bearings.
//! It solves the bearing reactions and bending/torque diagrams for a set of
//! point loads, then evaluates a fatigue or static failure criterion either
//! for a given diameter (safety factor) or for a target safety factor
//! (diameter). All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Explicit state**: each [`ShaftAnalysis`] owns its session and results
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, never NaN results
//!
//! ## Quick Start
//!
//! ```rust
//! use shaft_core::calculations::statics;
//! use shaft_core::session::LoadSession;
//!
//! let mut session = LoadSession::start(1.0, 1, 0.0, 1.0).unwrap();
//! session.add_load(0, -1000.0, 0.0, 0.5, 0.0, 0.0).unwrap();
//!
//! let result = statics::solve(&session, 1000).unwrap();
//! let json = serde_json::to_string_pretty(&result.reactions).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`session`] - Shaft geometry and point-load slots
//! - [`calculations`] - Statics, failure criteria and the inverse solve
//! - [`analysis`] - Stateful analysis built on the calculations
//! - [`job`] - JSON job files
//! - [`materials`] - SAE steel catalog and custom strengths
//! - [`settings`] - Unit system, sampling and solver settings
//! - [`units`] - Unit systems and type-safe unit wrappers
//! - [`fields`] - Parsing of user-entered numeric text
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod calculations;
pub mod errors;
pub mod fields;
pub mod job;
pub mod materials;
pub mod session;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use analysis::{AnalysisState, ShaftAnalysis};
pub use errors::{CalcError, CalcResult};
pub use job::{JobReport, ShaftJob};
pub use session::{LoadSession, PointLoad, ShaftGeometry};
pub use settings::{AnalysisSettings, SolverSettings};
pub use units::UnitSystem;
