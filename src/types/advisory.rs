//! OM policy advisory types: PolicyAdvisory, RunwayCondition, band enums,
//! AdvisoryFlag, EvidenceEntry, EvidenceTrail

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::report::ReportKind;

// ============================================================================
// Runway Condition Estimate
// ============================================================================

/// Runway surface condition estimated from weather-code proxies only —
/// never from SNOWTAM or field reports this engine does not receive.
///
/// Priority of evidence is SEVERE > CONTAM > WET > DRY: the first matching
/// category wins, so a report showing both snow and rain is CONTAM, not WET.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RunwayCondition {
    /// Freezing rain/drizzle, ice pellets, or hail (RWYCC ≈ 2)
    #[serde(rename = "SEVERE")]
    Severe,
    /// Snow in any form (RWYCC ≈ 3)
    #[serde(rename = "CONTAM")]
    Contam,
    /// Rain or drizzle (RWYCC ≈ 5)
    #[serde(rename = "WET")]
    Wet,
    /// No precipitation evidence (RWYCC ≈ 6)
    #[serde(rename = "DRY")]
    #[default]
    Dry,
}

impl RunwayCondition {
    /// Runway condition code estimate for this category
    pub fn rwycc(&self) -> u8 {
        match self {
            RunwayCondition::Severe => 2,
            RunwayCondition::Contam => 3,
            RunwayCondition::Wet => 5,
            RunwayCondition::Dry => 6,
        }
    }

    /// Short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            RunwayCondition::Severe => "SEVERE",
            RunwayCondition::Contam => "CONTAM",
            RunwayCondition::Wet => "WET",
            RunwayCondition::Dry => "DRY",
        }
    }
}

impl std::fmt::Display for RunwayCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

// ============================================================================
// Hierarchical Bands
// ============================================================================

/// Low-visibility operation band, tightest first. Evaluated as an ordered
/// predicate list: exactly one band (the first match) is ever reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum LvoBand {
    /// RVR below the absolute takeoff minimum (125 m)
    RvrBelowAbsoluteMin,
    /// RVR below 150 m: LVTO requires specific crew qualification
    LvtoCrewQual,
    /// Reference visibility below 400 m: low-visibility procedures
    Lvp,
    /// Reference visibility below 550 m: low-visibility takeoff
    Lvto,
}

/// Instrument approach category band required by the current RVR,
/// tightest first. Exactly one band is ever reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ApproachBand {
    /// RVR below even CAT III minima (75 m)
    Cat3BelowMin,
    /// RVR below 200 m: CAT III only
    Cat3Only,
    /// RVR below 450 m: CAT II or better required
    Cat2Plus,
}

// ============================================================================
// Advisory Flags & Evidence Trail
// ============================================================================

/// Identifier of an advisory flag, used to key evidence entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum AdvisoryFlag {
    ToProhibited,
    Lvto,
    Lvp,
    LvtoCrewQualRequired,
    RvrBelowAbsoluteMin,
    RvrReportingRequired,
    Cat2Plus,
    Cat3Only,
    Cat3BelowMin,
    RunwayConditionEstimate,
    NoOpsLikely,
    CrosswindExceed,
    VolcanicAsh,
    ColdCorrection,
}

/// One evidence record: which report raised a flag, the literal tokens
/// that matched, the threshold compared against, and a short snippet of
/// surrounding report text for human audit.
///
/// Purely observational — nothing here ever feeds back into flag values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceEntry {
    /// Flag this entry explains
    pub flag: AdvisoryFlag,
    /// Report the evidence came from
    pub source_report: ReportKind,
    /// Literal matched token(s)
    pub matched_tokens: Vec<String>,
    /// Human-readable description of the threshold compared against
    pub threshold_description: String,
    /// Short report-text excerpt around the first matched token
    pub snippet: Option<String>,
}

/// Ordered audit trail of evidence entries, one or more per raised flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct EvidenceTrail(pub Vec<EvidenceEntry>);

impl EvidenceTrail {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> &[EvidenceEntry] {
        &self.0
    }

    /// Entries recorded for a given flag
    pub fn for_flag(&self, flag: AdvisoryFlag) -> impl Iterator<Item = &EvidenceEntry> {
        self.0.iter().filter(move |e| e.flag == flag)
    }
}

// ============================================================================
// Policy Advisory (the OM evaluator output)
// ============================================================================

/// Complete OM-A/OM-B advisory flag set for one station.
///
/// Band booleans within the LVO quartet and the CAT trio are derived from
/// the selected band and are therefore mutually exclusive: only the single
/// tightest qualifying band is ever reported per metric. Takeoff
/// prohibition is unconditional and independent of every band.
///
/// Crosswind fields are all absent (never `false`/`0`) when no runway
/// geometry is supplied for the station or the wind is variable/missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAdvisory {
    /// Takeoff prohibited: a heavy-precipitation token is present
    pub to_prohibited: bool,
    /// Heavy-precipitation tokens matched across both reports
    pub heavy_precip_matches: BTreeSet<String>,

    /// Tightest low-visibility operation band, if any
    pub lvo_band: Option<LvoBand>,
    /// Low-visibility takeoff band (refVis < 550 m)
    pub lvto: bool,
    /// Low-visibility procedures band (refVis < 400 m)
    pub lvp: bool,
    /// LVTO crew qualification band (RVR < 150 m)
    pub lvto_crew_qual_required: bool,
    /// Below absolute RVR minimum band (RVR < 125 m)
    pub rvr_below_absolute_min: bool,

    /// Visibility < 800 m but no RVR group anywhere: reporting gap
    pub rvr_reporting_required: bool,

    /// Tightest approach category band, if any
    pub approach_band: Option<ApproachBand>,
    /// CAT II or better required (RVR < 450 m)
    pub cat2_plus: bool,
    /// CAT III only (RVR < 200 m)
    pub cat3_only: bool,
    /// Below CAT III minima (RVR < 75 m)
    pub cat3_below_min: bool,

    /// Runway condition estimated from weather-code proxies
    pub runway_condition_estimate: RunwayCondition,
    /// Runway condition code estimate (2..=6)
    pub rwycc_estimate: u8,
    /// Operations unlikely: RWYCC estimate below 3
    pub no_ops_likely: bool,

    /// Crosswind exceeds the (RWYCC, width)-keyed OM limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosswind_exceed: Option<bool>,
    /// Crosswind component on the best-aligned runway end (knots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosswind_kt: Option<u32>,
    /// Applicable crosswind limit (knots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosswind_limit_kt: Option<u32>,
    /// Name of the selected (best-aligned) runway end, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosswind_runway: Option<String>,

    /// Volcanic ash present in either report
    pub volcanic_ash: bool,
    /// METAR temperature at or below 0 °C: cold-temperature corrections apply
    pub cold_correction: bool,

    /// Ordered evidence trail for every raised flag
    pub explanation: EvidenceTrail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rwycc_mapping() {
        assert_eq!(RunwayCondition::Severe.rwycc(), 2);
        assert_eq!(RunwayCondition::Contam.rwycc(), 3);
        assert_eq!(RunwayCondition::Wet.rwycc(), 5);
        assert_eq!(RunwayCondition::Dry.rwycc(), 6);
    }

    #[test]
    fn condition_priority_order() {
        // Ord derives from declaration order: SEVERE sorts tightest.
        assert!(RunwayCondition::Severe < RunwayCondition::Contam);
        assert!(RunwayCondition::Contam < RunwayCondition::Wet);
        assert!(RunwayCondition::Wet < RunwayCondition::Dry);
    }

    #[test]
    fn band_enums_order_tightest_first() {
        assert!(LvoBand::RvrBelowAbsoluteMin < LvoBand::LvtoCrewQual);
        assert!(LvoBand::LvtoCrewQual < LvoBand::Lvp);
        assert!(LvoBand::Lvp < LvoBand::Lvto);
        assert!(ApproachBand::Cat3BelowMin < ApproachBand::Cat3Only);
        assert!(ApproachBand::Cat3Only < ApproachBand::Cat2Plus);
    }

    #[test]
    fn advisory_serializes_camel_case_contract() {
        let advisory = PolicyAdvisory {
            to_prohibited: true,
            rwycc_estimate: 6,
            ..PolicyAdvisory::default()
        };
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["toProhibited"], true);
        assert_eq!(json["rwyccEstimate"], 6);
        assert_eq!(json["runwayConditionEstimate"], "DRY");
        // Absent crosswind fields are omitted entirely, not serialized false.
        assert!(json.get("crosswindExceed").is_none());
        assert!(json.get("crosswindKt").is_none());
    }
}
