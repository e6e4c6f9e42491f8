//! # Load Session
//!
//! Shaft geometry plus a fixed number of point loads. The number of loads is
//! declared when the session starts; the session is complete once every slot
//! has been written, and only a complete session can be solved.
//!
//! ## Coordinates
//!
//! `x` runs along the shaft axis from 0 to `L`. Each load is applied at
//! `(rx, ry, rz)`: `rx` is its axial position, `(ry, rz)` the radial arm at
//! which the lateral force components `(Fy, Fz)` act. The arm produces a
//! torque `ry·Fz − rz·Fy` about the shaft axis.
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::session::LoadSession;
//!
//! let mut session = LoadSession::start(10.0, 1, 0.0, 10.0).unwrap();
//! assert!(!session.is_complete());
//!
//! session.add_load(0, -100.0, 0.0, 5.0, 0.0, 0.0).unwrap();
//! assert!(session.is_complete());
//! assert_eq!(session.positions(), vec![0.0, 10.0, 5.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Shaft length and bearing positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShaftGeometry {
    /// Shaft length L
    pub length: f64,
    /// Position of bearing A
    pub support_a: f64,
    /// Position of bearing B
    pub support_b: f64,
}

impl ShaftGeometry {
    /// Create validated geometry.
    pub fn new(length: f64, support_a: f64, support_b: f64) -> CalcResult<Self> {
        let geometry = ShaftGeometry {
            length,
            support_a,
            support_b,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check `L > 0` and `0 ≤ xA < xB ≤ L`.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(CalcError::invalid_input(
                "length",
                self.length.to_string(),
                "Shaft length must be positive",
            ));
        }
        if !(self.support_a.is_finite() && self.support_a >= 0.0 && self.support_a < self.length) {
            return Err(CalcError::invalid_input(
                "support_a",
                self.support_a.to_string(),
                format!("Bearing A must lie in [0, {})", self.length),
            ));
        }
        if !(self.support_b.is_finite() && self.support_b <= self.length) {
            return Err(CalcError::invalid_input(
                "support_b",
                self.support_b.to_string(),
                format!("Bearing B must lie in (0, {}]", self.length),
            ));
        }
        if self.support_b <= self.support_a {
            return Err(CalcError::invalid_input(
                "support_b",
                self.support_b.to_string(),
                format!("Bearing B must be beyond bearing A ({})", self.support_a),
            ));
        }
        Ok(())
    }

    /// Distance between the bearings
    pub fn span(&self) -> f64 {
        self.support_b - self.support_a
    }
}

/// A point load with its application arm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointLoad {
    /// Force component along y
    pub fy: f64,
    /// Force component along z
    pub fz: f64,
    /// Axial position of the load
    pub rx: f64,
    /// Radial arm along y
    #[serde(default)]
    pub ry: f64,
    /// Radial arm along z
    #[serde(default)]
    pub rz: f64,
}

impl PointLoad {
    /// Create a point load
    pub fn new(fy: f64, fz: f64, rx: f64, ry: f64, rz: f64) -> Self {
        PointLoad { fy, fz, rx, ry, rz }
    }

    /// A purely lateral load at axial position `x`
    pub fn lateral(fy: f64, fz: f64, x: f64) -> Self {
        PointLoad::new(fy, fz, x, 0.0, 0.0)
    }

    /// Torque about the shaft axis: `ry·Fz − rz·Fy`
    pub fn torque(&self) -> f64 {
        self.ry * self.fz - self.rz * self.fy
    }

    /// Same load with both force components multiplied by `k`
    pub fn scaled(&self, k: f64) -> Self {
        PointLoad {
            fy: self.fy * k,
            fz: self.fz * k,
            ..*self
        }
    }
}

/// Geometry and a fixed-size set of load slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSession {
    geometry: ShaftGeometry,
    slots: Vec<Option<PointLoad>>,
}

impl LoadSession {
    /// Start a session of `load_count` empty load slots.
    pub fn start(length: f64, load_count: usize, support_a: f64, support_b: f64) -> CalcResult<Self> {
        let geometry = ShaftGeometry::new(length, support_a, support_b)?;
        LoadSession::with_geometry(geometry, load_count)
    }

    /// Start a session on already-built geometry.
    pub fn with_geometry(geometry: ShaftGeometry, load_count: usize) -> CalcResult<Self> {
        geometry.validate()?;
        if load_count == 0 {
            return Err(CalcError::invalid_input(
                "load_count",
                "0",
                "At least one load is required",
            ));
        }
        Ok(LoadSession {
            geometry,
            slots: vec![None; load_count],
        })
    }

    /// Write load slot `index`. Writing a slot twice replaces the earlier load.
    pub fn add_load(&mut self, index: usize, fy: f64, fz: f64, rx: f64, ry: f64, rz: f64) -> CalcResult<()> {
        self.set_load(index, PointLoad::new(fy, fz, rx, ry, rz))
    }

    /// Write load slot `index` from a [`PointLoad`].
    pub fn set_load(&mut self, index: usize, load: PointLoad) -> CalcResult<()> {
        let len = self.slots.len();
        if index >= len {
            return Err(CalcError::index_out_of_range(index, len));
        }
        for (field, value) in [
            ("fy", load.fy),
            ("fz", load.fz),
            ("rx", load.rx),
            ("ry", load.ry),
            ("rz", load.rz),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value must be finite"));
            }
        }
        if load.rx < 0.0 || load.rx > self.geometry.length {
            return Err(CalcError::invalid_input(
                "rx",
                load.rx.to_string(),
                format!("Load position must lie in [0, {}]", self.geometry.length),
            ));
        }
        self.slots[index] = Some(load);
        Ok(())
    }

    /// Write the first empty slot and return its index.
    pub fn push_load(&mut self, load: PointLoad) -> CalcResult<usize> {
        let index = self
            .next_free_slot()
            .ok_or_else(|| CalcError::index_out_of_range(self.slots.len(), self.slots.len()))?;
        self.set_load(index, load)?;
        Ok(index)
    }

    /// Shaft geometry
    pub fn geometry(&self) -> &ShaftGeometry {
        &self.geometry
    }

    /// Declared number of loads
    pub fn load_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots written so far
    pub fn loads_supplied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Index of the first unwritten slot
    pub fn next_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// True once every slot has been written
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// Load in slot `index`, if written
    pub fn load(&self, index: usize) -> Option<&PointLoad> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// All loads in slot order. Fails while any slot is still empty.
    pub fn loads(&self) -> CalcResult<Vec<PointLoad>> {
        if !self.is_complete() {
            let missing: Vec<String> = self
                .slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_none())
                .map(|(i, _)| i.to_string())
                .collect();
            return Err(CalcError::invalid_input(
                "loads",
                format!("{}/{}", self.loads_supplied(), self.load_count()),
                format!("Load slots not yet supplied: {}", missing.join(", ")),
            ));
        }
        Ok(self.slots.iter().flatten().copied().collect())
    }

    /// Axial positions of the bearings followed by every written load
    pub fn positions(&self) -> Vec<f64> {
        let mut positions = vec![self.geometry.support_a, self.geometry.support_b];
        positions.extend(self.slots.iter().flatten().map(|load| load.rx));
        positions
    }
}
