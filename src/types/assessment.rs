//! Severity and alert types: AlertLevel, SeverityAssessment, StationAssessment

use serde::{Deserialize, Serialize};

use super::advisory::PolicyAdvisory;
use super::report::ParsedObservation;
use super::runway::MinimaBand;
use super::thresholds::alert_boundaries;

// ============================================================================
// Alert Level
// ============================================================================

/// Ordinal alert level for a station
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum AlertLevel {
    #[serde(rename = "OK")]
    #[default]
    Ok,
    #[serde(rename = "MED")]
    Med,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "CRIT")]
    Crit,
}

impl AlertLevel {
    /// Base classification from a combined 0-100 severity score.
    ///
    /// Boundaries are inclusive: a score of exactly 70 is CRIT.
    pub fn from_score(score: u8) -> Self {
        if score >= alert_boundaries::CRIT_SCORE {
            AlertLevel::Crit
        } else if score >= alert_boundaries::HIGH_SCORE {
            AlertLevel::High
        } else if score >= alert_boundaries::MED_SCORE {
            AlertLevel::Med
        } else {
            AlertLevel::Ok
        }
    }

    /// Minimum score consistent with this level. After pillar escalation the
    /// numeric score is clamped up to this floor so score and alert never
    /// visually disagree.
    pub fn score_floor(&self) -> u8 {
        match self {
            AlertLevel::Crit => alert_boundaries::CRIT_SCORE,
            AlertLevel::High => alert_boundaries::HIGH_SCORE,
            AlertLevel::Med => alert_boundaries::MED_SCORE,
            AlertLevel::Ok => 0,
        }
    }

    /// Short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            AlertLevel::Ok => "OK",
            AlertLevel::Med => "MED",
            AlertLevel::High => "HIGH",
            AlertLevel::Crit => "CRIT",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

// ============================================================================
// Severity Assessment
// ============================================================================

/// Combined per-station severity: both per-report scores, the combined
/// score (METAR outranks discounted TAF), and the escalated alert level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeverityAssessment {
    /// Additive METAR score before combination (0-100)
    pub metar_score: u8,
    /// Additive TAF score before discounting (0-100)
    pub taf_score: u8,
    /// Combined score after override, escalation, and floor clamping (0-100)
    pub score: u8,
    /// Final alert level (max of base, wind pillar, snow pillar)
    pub alert_level: AlertLevel,
}

// ============================================================================
// Station Assessment (the output record)
// ============================================================================

/// One structured record per station: both parsed observations, the
/// combined severity assessment, and the OM policy advisory. This is the
/// stable JSON contract consumed by dashboard, map, and change-detection
/// collaborators.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationAssessment {
    /// 4-character station identifier
    pub station: String,
    /// Fields extracted from the METAR, if one was supplied
    pub metar: Option<ParsedObservation>,
    /// Fields extracted from the TAF, if one was supplied
    pub taf: Option<ParsedObservation>,
    /// Combined severity score and alert level
    pub severity: SeverityAssessment,
    /// OM-A/OM-B advisory flags with evidence trail
    pub advisory: PolicyAdvisory,
    /// Where the METAR sits relative to the station's approach minima,
    /// when a minima table entry was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minima_band: Option<MinimaBand>,
}
