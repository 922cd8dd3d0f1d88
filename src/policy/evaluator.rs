//! OM policy evaluator
//!
//! Applies the layered operating-manual thresholds to the decoded reports
//! of one station. Hierarchical bands (LVO, approach categories) are
//! ordered predicate ladders evaluated top-down — only the single tightest
//! qualifying band is reported per metric. Heavy-precipitation takeoff
//! prohibition is unconditional and independent of every band. Every
//! raised flag leaves an evidence entry behind.

use std::collections::BTreeSet;
use tracing::debug;

use super::crosswind::evaluate_crosswind;
use super::evidence::EvidenceBuilder;
use crate::decoder::extract::union_hazards;
use crate::decoder::{DecodedReport, Provenance};
use crate::types::om_limits as limits;
use crate::types::{
    AdvisoryFlag, ApproachBand, LvoBand, ParsedObservation, Phenomenon, PolicyAdvisory,
    ReportKind, RunwayCondition, RunwayEnd,
};

/// Phenomena that make the runway condition SEVERE (RWYCC ≈ 2)
const SEVERE_CONDITION: [Phenomenon; 4] = [
    Phenomenon::Fzra,
    Phenomenon::Fzdz,
    Phenomenon::Pl,
    Phenomenon::Gr,
];

/// Phenomena that make the runway condition CONTAM (RWYCC ≈ 3)
const CONTAM_CONDITION: [Phenomenon; 6] = [
    Phenomenon::Sn,
    Phenomenon::Sg,
    Phenomenon::Gs,
    Phenomenon::Blsn,
    Phenomenon::Drsn,
    Phenomenon::Shsn,
];

/// Phenomena that make the runway condition WET (RWYCC ≈ 5)
const WET_CONDITION: [Phenomenon; 2] = [Phenomenon::Ra, Phenomenon::Dz];

/// A threshold input with attribution to the report and token it came from
#[derive(Debug, Clone)]
struct Sourced {
    value: u32,
    source: ReportKind,
    token: Option<String>,
}

impl Sourced {
    fn tokens(&self) -> Vec<String> {
        self.token.clone().into_iter().collect()
    }
}

/// Evaluate the full OM advisory flag set for one station.
///
/// Pure function of the supplied reports and runway geometry; carries no
/// memory between evaluations.
pub fn evaluate_policy(
    metar: Option<&DecodedReport>,
    taf: Option<&DecodedReport>,
    runway_ends: Option<&[RunwayEnd]>,
) -> PolicyAdvisory {
    let mut evidence = EvidenceBuilder::new(
        metar.map(|d| d.report.text()),
        taf.map(|d| d.report.text()),
    );

    let vis = min_field(metar, taf, |o| o.visibility_meters, |p| {
        p.visibility_token.clone()
    });
    let rvr = min_field(metar, taf, |o| o.rvr_meters, |p| p.rvr_token.clone());
    // RVR is the more precise measure: it takes precedence whenever any
    // RVR group exists anywhere in the report text.
    let ref_vis = rvr.clone().or_else(|| vis.clone());

    // ---- Takeoff prohibition (unconditional) ----
    let mut to_prohibited = false;
    let mut heavy_precip_matches: BTreeSet<String> = BTreeSet::new();
    for decoded in [metar, taf].into_iter().flatten() {
        let heavy = &decoded.observation.heavy_precip_tokens;
        if heavy.is_empty() {
            continue;
        }
        to_prohibited = true;
        heavy_precip_matches.extend(heavy.iter().cloned());
        let canonical: Vec<&str> = heavy.iter().map(String::as_str).collect();
        evidence.record(
            AdvisoryFlag::ToProhibited,
            decoded.report.kind(),
            decoded.provenance.heavy_tokens.values().cloned().collect(),
            format!(
                "heavy precipitation ({}) prohibits takeoff",
                canonical.join(", ")
            ),
        );
    }

    // ---- Low-visibility operation band (tightest only) ----
    let lvo_band = lvo_band(&rvr, &ref_vis, &mut evidence);
    let lvto = lvo_band == Some(LvoBand::Lvto);
    let lvp = lvo_band == Some(LvoBand::Lvp);
    let lvto_crew_qual_required = lvo_band == Some(LvoBand::LvtoCrewQual);
    let rvr_below_absolute_min = lvo_band == Some(LvoBand::RvrBelowAbsoluteMin);

    // ---- Approach category band (tightest only) ----
    let approach_band = approach_band(&rvr, &mut evidence);
    let cat2_plus = approach_band == Some(ApproachBand::Cat2Plus);
    let cat3_only = approach_band == Some(ApproachBand::Cat3Only);
    let cat3_below_min = approach_band == Some(ApproachBand::Cat3BelowMin);

    // ---- RVR reporting gap ----
    let mut rvr_reporting_required = false;
    if rvr.is_none() {
        if let Some(vis) = &vis {
            if vis.value < limits::RVR_REPORTING_VIS_M {
                rvr_reporting_required = true;
                evidence.record(
                    AdvisoryFlag::RvrReportingRequired,
                    vis.source,
                    vis.tokens(),
                    format!(
                        "visibility {} m < {} m with no RVR group reported",
                        vis.value,
                        limits::RVR_REPORTING_VIS_M
                    ),
                );
            }
        }
    }

    // ---- Runway condition estimate ----
    let hazard_sources = union_hazards(metar, taf);
    let present =
        |p: Phenomenon| hazard_sources.contains_key(&p);
    let (runway_condition_estimate, condition_members): (RunwayCondition, &[Phenomenon]) =
        if SEVERE_CONDITION.iter().any(|&p| present(p)) {
            (RunwayCondition::Severe, &SEVERE_CONDITION)
        } else if CONTAM_CONDITION.iter().any(|&p| present(p)) {
            (RunwayCondition::Contam, &CONTAM_CONDITION)
        } else if WET_CONDITION.iter().any(|&p| present(p)) {
            (RunwayCondition::Wet, &WET_CONDITION)
        } else {
            (RunwayCondition::Dry, &[])
        };
    let rwycc_estimate = runway_condition_estimate.rwycc();

    if runway_condition_estimate != RunwayCondition::Dry {
        record_condition_evidence(
            &mut evidence,
            &hazard_sources,
            condition_members,
            runway_condition_estimate,
        );
    }

    let no_ops_likely = rwycc_estimate < limits::NO_OPS_RWYCC;
    if no_ops_likely {
        if let Some((decoded, token)) = condition_members
            .iter()
            .find_map(|p| hazard_sources.get(p))
        {
            evidence.record(
                AdvisoryFlag::NoOpsLikely,
                decoded.report.kind(),
                vec![(*token).to_string()],
                format!(
                    "RWYCC estimate {} < {} - operations unlikely",
                    rwycc_estimate,
                    limits::NO_OPS_RWYCC
                ),
            );
        }
    }

    // ---- Volcanic ash ----
    let volcanic_ash = present(Phenomenon::Va);
    if volcanic_ash {
        if let Some((decoded, token)) = hazard_sources.get(&Phenomenon::Va) {
            evidence.record(
                AdvisoryFlag::VolcanicAsh,
                decoded.report.kind(),
                vec![(*token).to_string()],
                "volcanic ash reported".to_string(),
            );
        }
    }

    // ---- Cold-temperature correction (METAR only) ----
    let mut cold_correction = false;
    if let Some(decoded) = metar {
        if let Some(temp) = decoded.observation.temperature_c {
            if temp <= limits::COLD_CORRECTION_MAX_C {
                cold_correction = true;
                evidence.record(
                    AdvisoryFlag::ColdCorrection,
                    ReportKind::Metar,
                    decoded
                        .provenance
                        .temperature_token
                        .clone()
                        .into_iter()
                        .collect(),
                    format!(
                        "temperature {} °C ≤ {} °C - cold-temperature altitude corrections apply",
                        temp,
                        limits::COLD_CORRECTION_MAX_C
                    ),
                );
            }
        }
    }

    // ---- Crosswind against supplied runway geometry ----
    let crosswind = metar
        .and_then(|d| d.observation.wind.map(|w| (d, w)))
        .zip(runway_ends)
        .and_then(|((decoded, wind), ends)| {
            evaluate_crosswind(&wind, ends, rwycc_estimate).map(|a| (decoded, a))
        });
    let (crosswind_exceed, crosswind_kt, crosswind_limit_kt, crosswind_runway) = match &crosswind
    {
        Some((decoded, assessment)) => {
            if assessment.exceed {
                evidence.record(
                    AdvisoryFlag::CrosswindExceed,
                    ReportKind::Metar,
                    decoded.provenance.wind_token.clone().into_iter().collect(),
                    format!(
                        "crosswind {} kt > {} kt limit (RWYCC {})",
                        assessment.crosswind_kt, assessment.limit_kt, rwycc_estimate
                    ),
                );
            }
            (
                Some(assessment.exceed),
                Some(assessment.crosswind_kt),
                Some(assessment.limit_kt),
                assessment.runway.clone(),
            )
        }
        None => (None, None, None, None),
    };

    debug!(
        to_prohibited,
        ?lvo_band,
        ?approach_band,
        condition = %runway_condition_estimate,
        ?crosswind_exceed,
        "Policy evaluated"
    );

    PolicyAdvisory {
        to_prohibited,
        heavy_precip_matches,
        lvo_band,
        lvto,
        lvp,
        lvto_crew_qual_required,
        rvr_below_absolute_min,
        rvr_reporting_required,
        approach_band,
        cat2_plus,
        cat3_only,
        cat3_below_min,
        runway_condition_estimate,
        rwycc_estimate,
        no_ops_likely,
        crosswind_exceed,
        crosswind_kt,
        crosswind_limit_kt,
        crosswind_runway,
        volcanic_ash,
        cold_correction,
        explanation: evidence.finish(),
    }
}

/// Worst (minimum) value of a field across both reports, METAR winning
/// ties so evidence attributes to the observed report.
fn min_field(
    metar: Option<&DecodedReport>,
    taf: Option<&DecodedReport>,
    value: impl Fn(&ParsedObservation) -> Option<u32>,
    token: impl Fn(&Provenance) -> Option<String>,
) -> Option<Sourced> {
    let mut best: Option<Sourced> = None;
    for decoded in [metar, taf].into_iter().flatten() {
        if let Some(v) = value(&decoded.observation) {
            if best.as_ref().is_none_or(|b| v < b.value) {
                best = Some(Sourced {
                    value: v,
                    source: decoded.report.kind(),
                    token: token(&decoded.provenance),
                });
            }
        }
    }
    best
}

/// LVO ladder, tightest first: RVR absolute minimum, LVTO crew
/// qualification (both RVR-specific), then LVP and LVTO on the reference
/// visibility. All boundaries strict `<`.
fn lvo_band(
    rvr: &Option<Sourced>,
    ref_vis: &Option<Sourced>,
    evidence: &mut EvidenceBuilder<'_>,
) -> Option<LvoBand> {
    if let Some(rvr) = rvr {
        if rvr.value < limits::RVR_ABSOLUTE_MIN_M {
            evidence.record(
                AdvisoryFlag::RvrBelowAbsoluteMin,
                rvr.source,
                rvr.tokens(),
                format!(
                    "RVR {} m < {} m absolute minimum",
                    rvr.value,
                    limits::RVR_ABSOLUTE_MIN_M
                ),
            );
            return Some(LvoBand::RvrBelowAbsoluteMin);
        }
        if rvr.value < limits::LVTO_CREW_QUAL_RVR_M {
            evidence.record(
                AdvisoryFlag::LvtoCrewQualRequired,
                rvr.source,
                rvr.tokens(),
                format!(
                    "RVR {} m < {} m - LVTO crew qualification required",
                    rvr.value,
                    limits::LVTO_CREW_QUAL_RVR_M
                ),
            );
            return Some(LvoBand::LvtoCrewQual);
        }
    }
    if let Some(ref_vis) = ref_vis {
        if ref_vis.value < limits::LVP_VIS_M {
            evidence.record(
                AdvisoryFlag::Lvp,
                ref_vis.source,
                ref_vis.tokens(),
                format!(
                    "reference visibility {} m < {} m - low-visibility procedures",
                    ref_vis.value,
                    limits::LVP_VIS_M
                ),
            );
            return Some(LvoBand::Lvp);
        }
        if ref_vis.value < limits::LVTO_VIS_M {
            evidence.record(
                AdvisoryFlag::Lvto,
                ref_vis.source,
                ref_vis.tokens(),
                format!(
                    "reference visibility {} m < {} m - low-visibility takeoff",
                    ref_vis.value,
                    limits::LVTO_VIS_M
                ),
            );
            return Some(LvoBand::Lvto);
        }
    }
    None
}

/// Approach category ladder on the RVR minimum, tightest first
fn approach_band(
    rvr: &Option<Sourced>,
    evidence: &mut EvidenceBuilder<'_>,
) -> Option<ApproachBand> {
    let rvr = rvr.as_ref()?;
    let (band, flag, description) = if rvr.value < limits::CAT3_MIN_RVR_M {
        (
            ApproachBand::Cat3BelowMin,
            AdvisoryFlag::Cat3BelowMin,
            format!(
                "RVR {} m < {} m - below CAT III minima",
                rvr.value,
                limits::CAT3_MIN_RVR_M
            ),
        )
    } else if rvr.value < limits::CAT3_RVR_M {
        (
            ApproachBand::Cat3Only,
            AdvisoryFlag::Cat3Only,
            format!(
                "RVR {} m < {} m - CAT III only",
                rvr.value,
                limits::CAT3_RVR_M
            ),
        )
    } else if rvr.value < limits::CAT2_RVR_M {
        (
            ApproachBand::Cat2Plus,
            AdvisoryFlag::Cat2Plus,
            format!(
                "RVR {} m < {} m - CAT II or better required",
                rvr.value,
                limits::CAT2_RVR_M
            ),
        )
    } else {
        return None;
    };
    evidence.record(flag, rvr.source, rvr.tokens(), description);
    Some(band)
}

/// Evidence for the runway condition estimate, one entry per source report
fn record_condition_evidence(
    evidence: &mut EvidenceBuilder<'_>,
    hazard_sources: &std::collections::BTreeMap<Phenomenon, (&DecodedReport, &str)>,
    members: &[Phenomenon],
    condition: RunwayCondition,
) {
    for kind in [ReportKind::Metar, ReportKind::Taf] {
        // A combined code can raise several member phenomena from one
        // token (BLSN raises both BLSN and SN) — dedupe before recording.
        let tokens: Vec<String> = members
            .iter()
            .filter_map(|p| hazard_sources.get(p))
            .filter(|(decoded, _)| decoded.report.kind() == kind)
            .map(|(_, token)| (*token).to_string())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        if !tokens.is_empty() {
            evidence.record(
                AdvisoryFlag::RunwayConditionEstimate,
                kind,
                tokens,
                format!(
                    "weather-code proxy estimates runway condition {} (RWYCC {})",
                    condition,
                    condition.rwycc()
                ),
            );
        }
    }
}
