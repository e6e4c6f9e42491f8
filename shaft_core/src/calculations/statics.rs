//! Two-Bearing Shaft Statics
//!
//! Support reactions and bending/torque diagrams for a shaft on two bearings
//! under point loads. Uses superposition of the step contribution of every
//! force (reactions included) past its point of application.
//!
//! ## Sign Convention
//! - Moments are taken about bearing A with arms `(rx − xA, ry, rz)`
//! - `Mh` (horizontal plane, x-z) accumulates `−Fz·⟨x − a⟩`
//! - `Mv` (vertical plane, x-y) accumulates `+Fy·⟨x − a⟩`
//! - `Mt` steps by `ry·Fz − rz·Fy` at each load position
//!
//! ## Example
//! ```rust
//! use shaft_core::calculations::statics;
//! use shaft_core::session::LoadSession;
//!
//! // 10 m shaft, bearings at the ends, 100 N downward at mid-span
//! let mut session = LoadSession::start(10.0, 1, 0.0, 10.0).unwrap();
//! session.add_load(0, -100.0, 0.0, 5.0, 0.0, 0.0).unwrap();
//!
//! let result = statics::solve(&session, 1000).unwrap();
//! assert!((result.reactions.a[1] - 50.0).abs() < 1e-9);
//! assert!((result.max_abs_mv - 250.0).abs() < 1.0);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::session::{LoadSession, PointLoad};

/// Relative span below which the bearings are treated as coincident
const DEGENERATE_SPAN: f64 = 1e-12;

/// Bearing reactions. Axial components are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionSet {
    /// Reaction at bearing A as (x, y, z)
    pub a: [f64; 3],
    /// Reaction at bearing B as (x, y, z)
    pub b: [f64; 3],
}

/// Sampled diagrams over `[0, L]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentField {
    /// Sample positions
    pub x: Vec<f64>,
    /// Bending moment in the horizontal plane
    pub mh: Vec<f64>,
    /// Bending moment in the vertical plane
    pub mv: Vec<f64>,
    /// Torque
    pub mt: Vec<f64>,
}

/// Diagram values at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentSample {
    /// Sample index
    pub index: usize,
    /// Position of the sample
    pub x: f64,
    /// Horizontal-plane bending moment
    pub mh: f64,
    /// Vertical-plane bending moment
    pub mv: f64,
    /// Resultant bending moment √(Mh² + Mv²)
    pub mr: f64,
    /// Torque
    pub mt: f64,
}

impl MomentField {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True if the field has no samples
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Shaft length covered by the field
    pub fn length(&self) -> f64 {
        self.x.last().copied().unwrap_or(0.0)
    }

    /// Resultant bending moment at every sample
    pub fn resultant(&self) -> Vec<f64> {
        self.mh
            .iter()
            .zip(&self.mv)
            .map(|(h, v)| h.hypot(*v))
            .collect()
    }

    /// Nearest sample index: `round((position / L)·(n − 1))`, clamped
    pub fn sample_index(&self, position: f64) -> usize {
        let n = self.len();
        let length = self.length();
        if n < 2 || length <= 0.0 || !position.is_finite() {
            return 0;
        }
        let raw = (position / length * (n - 1) as f64).round();
        raw.clamp(0.0, (n - 1) as f64) as usize
    }

    /// Diagram values at the sample nearest to `position`, `None` for an
    /// empty field
    pub fn sample_at(&self, position: f64) -> Option<MomentSample> {
        self.sample(self.sample_index(position))
    }

    /// Diagram values at sample `index` (clamped to the last sample)
    pub fn sample(&self, index: usize) -> Option<MomentSample> {
        let i = index.min(self.len().checked_sub(1)?);
        let (mh, mv) = (*self.mh.get(i)?, *self.mv.get(i)?);
        Some(MomentSample {
            index: i,
            x: self.x[i],
            mh,
            mv,
            mr: mh.hypot(mv),
            mt: *self.mt.get(i)?,
        })
    }

    /// Largest resultant bending moment and where it occurs
    pub fn max_resultant(&self) -> Option<MomentSample> {
        let index = self
            .resultant()
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, m)| if *m > best.1 { (i, *m) } else { best })
            .0;
        self.sample(index)
    }

    /// Largest torque magnitude
    pub fn max_abs_torque(&self) -> f64 {
        max_abs(&self.mt)
    }
}

/// Result of a statics solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramResult {
    /// Bearing reactions
    pub reactions: ReactionSet,
    /// Sampled diagrams (end samples zeroed)
    pub field: MomentField,
    /// max |Mh| before the end samples were zeroed
    pub max_abs_mh: f64,
    /// max |Mv| before the end samples were zeroed
    pub max_abs_mv: f64,
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
}

/// Bearing reactions from moment balance about A and force balance.
pub fn reactions(session: &LoadSession) -> CalcResult<ReactionSet> {
    let loads = session.loads()?;
    let geometry = session.geometry();
    let span = geometry.span();
    if span.abs() <= DEGENERATE_SPAN * geometry.length {
        return Err(CalcError::domain(
            "support span",
            format!("Bearings at {} and {} coincide", geometry.support_a, geometry.support_b),
        ));
    }

    let moment = loads.iter().fold([0.0; 3], |acc, load| {
        let arm = [load.rx - geometry.support_a, load.ry, load.rz];
        let m = cross(arm, [0.0, load.fy, load.fz]);
        [acc[0] + m[0], acc[1] + m[1], acc[2] + m[2]]
    });

    let by = -moment[2] / span;
    let bz = moment[1] / span;
    let sum_fy: f64 = loads.iter().map(|l| l.fy).sum();
    let sum_fz: f64 = loads.iter().map(|l| l.fz).sum();

    Ok(ReactionSet {
        a: [0.0, -by - sum_fy, -bz - sum_fz],
        b: [0.0, by, bz],
    })
}

/// Solve reactions and sample the diagrams at `sample_count` points.
pub fn solve(session: &LoadSession, sample_count: usize) -> CalcResult<DiagramResult> {
    if sample_count < 2 {
        return Err(CalcError::invalid_input(
            "sample_count",
            sample_count.to_string(),
            "At least two samples are needed to span the shaft",
        ));
    }
    let reactions = reactions(session)?;
    let loads = session.loads()?;
    let geometry = session.geometry();
    let length = geometry.length;
    let n = sample_count;

    debug!(
        "statics: {} loads, reactions A=({:.4}, {:.4}) B=({:.4}, {:.4})",
        loads.len(),
        reactions.a[1],
        reactions.a[2],
        reactions.b[1],
        reactions.b[2]
    );

    let mut x: Vec<f64> = (0..n).map(|k| length * k as f64 / (n - 1) as f64).collect();
    x[n - 1] = length;

    // Reactions first, then the applied loads, each at its axial position
    let mut extended: Vec<(f64, f64, f64)> = vec![
        (geometry.support_a, reactions.a[1], reactions.a[2]),
        (geometry.support_b, reactions.b[1], reactions.b[2]),
    ];
    extended.extend(loads.iter().map(|l| (l.rx, l.fy, l.fz)));

    let mut mh = vec![0.0; n];
    let mut mv = vec![0.0; n];
    for &(position, fy, fz) in &extended {
        for (k, &xk) in x.iter().enumerate() {
            let lever = (xk - position).max(0.0);
            mh[k] -= fz * lever;
            mv[k] += fy * lever;
        }
    }

    let mt = torque_diagram(&x, &loads);

    let max_abs_mh = max_abs(&mh);
    let max_abs_mv = max_abs(&mv);

    let mut field = MomentField { x, mh, mv, mt };
    for series in [&mut field.mh, &mut field.mv, &mut field.mt] {
        series[0] = 0.0;
        series[n - 1] = 0.0;
    }

    Ok(DiagramResult {
        reactions,
        field,
        max_abs_mh,
        max_abs_mv,
    })
}

/// Stepwise torque: each load adds its torque from the first sample at or
/// past its position to the end of the shaft.
fn torque_diagram(x: &[f64], loads: &[PointLoad]) -> Vec<f64> {
    let mut mt = vec![0.0; x.len()];
    for load in loads {
        let torque = load.torque();
        if torque == 0.0 {
            continue;
        }
        match x.iter().position(|&xk| xk >= load.rx) {
            Some(start) => mt[start..].iter_mut().for_each(|m| *m += torque),
            None => debug!("statics: torque at x={} lies past the last sample", load.rx),
        }
    }
    mt
}
