//! Runway geometry and approach minima lookup tables
//!
//! Both tables are explicit caller-supplied inputs (no ambient globals):
//! the runway table feeds only the crosswind calculation, the minima table
//! only the adjacent minima-band comparison. Absence of a station in either
//! table is a valid non-error condition that degrades the corresponding
//! sub-result to "unavailable".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::EngineError;

// ============================================================================
// Runway Geometry
// ============================================================================

/// One runway end. Each physical runway contributes two ends with
/// reciprocal headings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunwayEnd {
    /// Magnetic heading of this end in degrees (0..360)
    pub heading_deg: u16,
    /// Runway width in meters, when the source database knows it
    #[serde(default)]
    pub width_m: Option<f64>,
    /// Designator, e.g. "09L"
    #[serde(default)]
    pub name: Option<String>,
}

impl RunwayEnd {
    /// Narrow runways (< 45 m) use the tighter crosswind limit column.
    /// Unknown width is treated as standard.
    pub fn is_narrow(&self) -> bool {
        self.width_m
            .is_some_and(|w| w < super::thresholds::om_limits::NARROW_RUNWAY_WIDTH_M)
    }
}

/// Station → runway ends lookup, sourced from an open aerodrome database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct RunwayTable(pub BTreeMap<String, Vec<RunwayEnd>>);

impl RunwayTable {
    /// Runway ends for a station; `None` when the station is not listed.
    pub fn ends_for(&self, station: &str) -> Option<&[RunwayEnd]> {
        self.0.get(station).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse from a TOML document (station tables of runway-end arrays).
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::TableParse {
            format: "TOML",
            message: e.to_string(),
        })
    }

    /// Parse from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, EngineError> {
        serde_json::from_str(s).map_err(|e| EngineError::TableParse {
            format: "JSON",
            message: e.to_string(),
        })
    }

    /// Load from a `.toml` or `.json` file, sniffing format by extension.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let table = load_table(path, Self::from_toml_str, Self::from_json_str)?;
        info!(path = %path.display(), stations = table.len(), "Loaded runway geometry table");
        Ok(table)
    }
}

// ============================================================================
// Approach Minima
// ============================================================================

/// A visibility/ceiling minima pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinimaPair {
    /// Minimum visibility in meters
    pub vis_m: u32,
    /// Minimum ceiling in feet
    pub cig_ft: u32,
}

/// Per-station approach minima: the best-equipped runway's pair and an
/// alternate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApproachMinima {
    pub best: MinimaPair,
    pub alt: MinimaPair,
}

/// Where an observation sits relative to a station's approach minima,
/// tightest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum MinimaBand {
    /// Below both the best and the alternate minima
    BelowBoth,
    /// Below exactly one of the two pairs
    BelowOne,
    /// At or above both pairs
    Above,
}

impl ApproachMinima {
    /// Compare an observation against both minima pairs.
    ///
    /// An observation is "below" a pair when its visibility is under the
    /// pair's visibility minimum or its ceiling is under the ceiling
    /// minimum; an absent field contributes nothing.
    pub fn band(&self, visibility_m: Option<u32>, ceiling_ft: Option<u32>) -> MinimaBand {
        let below = |pair: &MinimaPair| {
            visibility_m.is_some_and(|v| v < pair.vis_m)
                || ceiling_ft.is_some_and(|c| c < pair.cig_ft)
        };
        match (below(&self.best), below(&self.alt)) {
            (true, true) => MinimaBand::BelowBoth,
            (true, false) | (false, true) => MinimaBand::BelowOne,
            (false, false) => MinimaBand::Above,
        }
    }
}

/// Station → approach minima lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct MinimaTable(pub BTreeMap<String, ApproachMinima>);

impl MinimaTable {
    pub fn minima_for(&self, station: &str) -> Option<&ApproachMinima> {
        self.0.get(station)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::TableParse {
            format: "TOML",
            message: e.to_string(),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, EngineError> {
        serde_json::from_str(s).map_err(|e| EngineError::TableParse {
            format: "JSON",
            message: e.to_string(),
        })
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let table = load_table(path, Self::from_toml_str, Self::from_json_str)?;
        info!(path = %path.display(), stations = table.0.len(), "Loaded approach minima table");
        Ok(table)
    }
}

/// Shared extension-sniffing loader for the two table types
fn load_table<T>(
    path: &Path,
    from_toml: impl Fn(&str) -> Result<T, EngineError>,
    from_json: impl Fn(&str) -> Result<T, EngineError>,
) -> anyhow::Result<T> {
    use anyhow::Context;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading table file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let table = match extension.as_str() {
        "toml" => from_toml(&contents)?,
        "json" => from_json(&contents)?,
        other => {
            return Err(EngineError::UnsupportedTableFormat {
                extension: other.to_string(),
            }
            .into())
        }
    };
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RUNWAYS_TOML: &str = r#"
[[ENGM]]
headingDeg = 10
widthM = 45.0
name = "01L"

[[ENGM]]
headingDeg = 190
widthM = 45.0
name = "19R"

[[ENSB]]
headingDeg = 100
widthM = 30.0
name = "10"
"#;

    #[test]
    fn toml_round_trip_and_lookup() {
        let table = RunwayTable::from_toml_str(RUNWAYS_TOML).unwrap();
        let engm = table.ends_for("ENGM").unwrap();
        assert_eq!(engm.len(), 2);
        assert_eq!(engm[0].heading_deg, 10);
        assert_eq!(engm[0].name.as_deref(), Some("01L"));
        assert!(!engm[0].is_narrow());
        let ensb = table.ends_for("ENSB").unwrap();
        assert!(ensb[0].is_narrow());
        assert!(table.ends_for("XXXX").is_none());
    }

    #[test]
    fn unknown_width_is_standard() {
        let end = RunwayEnd {
            heading_deg: 90,
            width_m: None,
            name: None,
        };
        assert!(!end.is_narrow());
    }

    #[test]
    fn json_table_parses() {
        let json = r#"{"ENGM": [{"headingDeg": 10, "widthM": 45.0, "name": "01L"}]}"#;
        let table = RunwayTable::from_json_str(json).unwrap();
        assert_eq!(table.ends_for("ENGM").unwrap()[0].heading_deg, 10);
    }

    #[test]
    fn load_from_file_sniffs_extension() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        f.write_all(RUNWAYS_TOML.as_bytes()).unwrap();
        let table = RunwayTable::load_from_file(f.path()).unwrap();
        assert_eq!(table.len(), 2);

        let mut bad = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        bad.write_all(b"irrelevant").unwrap();
        assert!(RunwayTable::load_from_file(bad.path()).is_err());
    }

    #[test]
    fn minima_band_ladder() {
        let minima = ApproachMinima {
            best: MinimaPair { vis_m: 550, cig_ft: 200 },
            alt: MinimaPair { vis_m: 800, cig_ft: 400 },
        };
        assert_eq!(minima.band(Some(400), Some(100)), MinimaBand::BelowBoth);
        assert_eq!(minima.band(Some(600), Some(300)), MinimaBand::BelowOne);
        assert_eq!(minima.band(Some(5000), Some(1500)), MinimaBand::Above);
        // Absent fields contribute nothing.
        assert_eq!(minima.band(None, None), MinimaBand::Above);
    }
}
