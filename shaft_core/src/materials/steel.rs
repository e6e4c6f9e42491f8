//! SAE Carbon Steel Catalog
//!
//! Tensile and yield strengths for plain carbon shaft steels, hot rolled and
//! cold drawn. Each entry carries both the SI and the imperial pair so that a
//! unit-system switch never converts catalog values at runtime.
//!
//! Catalog names follow the `SAE 10xx LQ` (hot rolled) / `SAE 10xx LF` (cold
//! drawn) convention. Lookup also accepts `HR` / `CD` suffixes and ignores
//! case and whitespace.
//!
//! ## Example
//!
//! ```rust
//! use shaft_core::materials::steel;
//! use shaft_core::units::UnitSystem;
//!
//! let grade = steel::lookup("sae 1020 cd").unwrap();
//! let spec = grade.strengths(UnitSystem::Si);
//! assert_eq!(spec.ultimate, Some(470.0));
//! assert_eq!(spec.yield_strength, Some(390.0));
//! ```

use serde::{Deserialize, Serialize};

use super::MaterialSpec;
use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

/// Manufacturing condition of the bar stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Hot rolled (LQ)
    HotRolled,
    /// Cold drawn (LF)
    ColdDrawn,
}

impl Condition {
    /// Catalog suffix
    pub fn code(&self) -> &'static str {
        match self {
            Condition::HotRolled => "LQ",
            Condition::ColdDrawn => "LF",
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteelGrade {
    /// Catalog name (e.g. "SAE 1045 LF")
    pub name: &'static str,
    /// Bar condition
    pub condition: Condition,
    /// Ultimate tensile strength (MPa)
    pub su_mpa: f64,
    /// Ultimate tensile strength (ksi)
    pub su_ksi: f64,
    /// Yield strength (MPa)
    pub sy_mpa: f64,
    /// Yield strength (ksi)
    pub sy_ksi: f64,
}

impl SteelGrade {
    const fn new(
        name: &'static str,
        condition: Condition,
        su_mpa: f64,
        su_ksi: f64,
        sy_mpa: f64,
        sy_ksi: f64,
    ) -> Self {
        SteelGrade {
            name,
            condition,
            su_mpa,
            su_ksi,
            sy_mpa,
            sy_ksi,
        }
    }

    /// Strength pair in the requested unit system (MPa or ksi)
    pub fn strengths(&self, units: UnitSystem) -> MaterialSpec {
        match units {
            UnitSystem::Si => MaterialSpec::new(self.su_mpa, self.sy_mpa),
            UnitSystem::Imperial => MaterialSpec::new(self.su_ksi, self.sy_ksi),
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

use Condition::{ColdDrawn, HotRolled};

static SAE_STEELS: [SteelGrade; 23] = [
    SteelGrade::new("SAE 1006 LQ", HotRolled, 300.0, 43.0, 170.0, 24.0),
    SteelGrade::new("SAE 1006 LF", ColdDrawn, 330.0, 48.0, 280.0, 41.0),
    SteelGrade::new("SAE 1010 LQ", HotRolled, 320.0, 47.0, 180.0, 26.0),
    SteelGrade::new("SAE 1010 LF", ColdDrawn, 370.0, 53.0, 300.0, 44.0),
    SteelGrade::new("SAE 1015 LQ", HotRolled, 340.0, 50.0, 190.0, 27.5),
    SteelGrade::new("SAE 1015 LF", ColdDrawn, 390.0, 56.0, 320.0, 47.0),
    SteelGrade::new("SAE 1018 LQ", HotRolled, 400.0, 58.0, 220.0, 32.0),
    SteelGrade::new("SAE 1018 LF", ColdDrawn, 440.0, 64.0, 370.0, 54.0),
    SteelGrade::new("SAE 1020 LQ", HotRolled, 380.0, 55.0, 210.0, 30.0),
    SteelGrade::new("SAE 1020 LF", ColdDrawn, 470.0, 68.0, 390.0, 57.0),
    SteelGrade::new("SAE 1030 LQ", HotRolled, 470.0, 68.0, 260.0, 37.5),
    SteelGrade::new("SAE 1030 LF", ColdDrawn, 520.0, 76.0, 440.0, 64.0),
    SteelGrade::new("SAE 1035 LQ", HotRolled, 500.0, 72.0, 270.0, 39.5),
    SteelGrade::new("SAE 1035 LF", ColdDrawn, 550.0, 80.0, 460.0, 67.0),
    SteelGrade::new("SAE 1040 LQ", HotRolled, 520.0, 76.0, 290.0, 42.0),
    SteelGrade::new("SAE 1040 LF", ColdDrawn, 590.0, 85.0, 490.0, 71.0),
    SteelGrade::new("SAE 1045 LQ", HotRolled, 570.0, 82.0, 310.0, 45.0),
    SteelGrade::new("SAE 1045 LF", ColdDrawn, 630.0, 91.0, 530.0, 77.0),
    SteelGrade::new("SAE 1050 LQ", HotRolled, 620.0, 90.0, 340.0, 49.5),
    SteelGrade::new("SAE 1050 LF", ColdDrawn, 690.0, 90.0, 580.0, 84.0),
    SteelGrade::new("SAE 1060 LQ", HotRolled, 680.0, 98.0, 370.0, 54.0),
    SteelGrade::new("SAE 1080 LQ", HotRolled, 770.0, 112.0, 420.0, 61.5),
    SteelGrade::new("SAE 1095 LQ", HotRolled, 830.0, 120.0, 460.0, 66.0),
];

/// All catalog entries in catalog order
pub fn catalog() -> &'static [SteelGrade] {
    &SAE_STEELS
}

/// Normalize a catalog name for comparison: uppercase, no whitespace,
/// HR/CD mapped to LQ/LF.
fn normalize(name: &str) -> String {
    let compact: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_uppercase();
    let compact = if compact.starts_with("SAE") {
        compact
    } else {
        format!("SAE{}", compact)
    };
    if let Some(stem) = compact.strip_suffix("HR") {
        format!("{}LQ", stem)
    } else if let Some(stem) = compact.strip_suffix("CD") {
        format!("{}LF", stem)
    } else {
        compact
    }
}

/// Look up a steel grade by name.
pub fn lookup(name: &str) -> CalcResult<&'static SteelGrade> {
    let key = normalize(name);
    SAE_STEELS
        .iter()
        .find(|grade| normalize(grade.name) == key)
        .ok_or_else(|| CalcError::material_not_found(name))
}

/// All grades whose name starts with the given pattern (e.g. "SAE 104")
pub fn search(pattern: &str) -> Vec<&'static SteelGrade> {
    let key: String = pattern
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    SAE_STEELS
        .iter()
        .filter(|grade| normalize(grade.name).starts_with(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size_and_order() {
        assert_eq!(catalog().len(), 23);
        assert_eq!(catalog()[0].name, "SAE 1006 LQ");
        assert_eq!(catalog()[22].name, "SAE 1095 LQ");
    }

    #[test]
    fn test_lookup_variants() {
        assert_eq!(lookup("SAE 1045 LF").unwrap().su_mpa, 630.0);
        assert_eq!(lookup("sae1045lf").unwrap().su_mpa, 630.0);
        assert_eq!(lookup("1045 CD").unwrap().sy_mpa, 530.0);
        assert_eq!(lookup("SAE 1045 HR").unwrap().condition, Condition::HotRolled);
    }

    #[test]
    fn test_lookup_missing() {
        let err = lookup("SAE 4140").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_strengths_by_unit_system() {
        let grade = lookup("SAE 1030 LQ").unwrap();
        let si = grade.strengths(UnitSystem::Si);
        let us = grade.strengths(UnitSystem::Imperial);
        assert_eq!(si.ultimate, Some(470.0));
        assert_eq!(si.yield_strength, Some(260.0));
        assert_eq!(us.ultimate, Some(68.0));
        assert_eq!(us.yield_strength, Some(37.5));
    }

    #[test]
    fn test_yield_below_ultimate() {
        for grade in catalog() {
            assert!(grade.sy_mpa < grade.su_mpa, "{}", grade.name);
            assert!(grade.sy_ksi < grade.su_ksi, "{}", grade.name);
        }
    }

    #[test]
    fn test_search_prefix() {
        let found = search("SAE 104");
        assert_eq!(found.len(), 4);
        assert!(search("SAE 2").is_empty());
    }
}
