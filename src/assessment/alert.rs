//! Alert classifier: combined score plus independent escalation pillars
//!
//! METAR outranks TAF (the forecast score is discounted 15%). Two pillars
//! — wind and snow — run independently of the score; the final alert is
//! the maximum of all three, and the numeric score is clamped up to the
//! alert's floor so score and alert never visually disagree.

use tracing::debug;

use super::severity::{engine_ice_ops, score_report};
use crate::types::alert_boundaries as bounds;
use crate::types::{AlertLevel, ParsedObservation, Phenomenon, SeverityAssessment};

/// Assess one station from its decoded METAR and TAF observations.
pub fn assess_station(
    metar: Option<&ParsedObservation>,
    taf: Option<&ParsedObservation>,
) -> SeverityAssessment {
    let metar_score = metar.map_or(0, score_report);
    let taf_score = taf.map_or(0, score_report);

    // TAF is forecast, not observed: discount before combining.
    let discounted_taf = (f64::from(taf_score) * bounds::TAF_DISCOUNT).floor() as u8;
    let mut combined = metar_score.max(discounted_taf);

    if metar.is_some_and(engine_ice_ops) {
        combined = 100;
    }

    let base = AlertLevel::from_score(combined);
    let wind = wind_pillar(metar, taf);
    let snow = snow_pillar(metar, taf);
    let alert_level = base.max(wind).max(snow);
    let score = combined.max(alert_level.score_floor());

    if alert_level > base {
        debug!(
            base = %base,
            wind = %wind,
            snow = %snow,
            "Pillar escalation raised alert level"
        );
    }

    SeverityAssessment {
        metar_score,
        taf_score,
        score,
        alert_level,
    }
}

/// Wind pillar over the maximum gust across both reports
fn wind_pillar(metar: Option<&ParsedObservation>, taf: Option<&ParsedObservation>) -> AlertLevel {
    let gust = [metar, taf]
        .into_iter()
        .flatten()
        .filter_map(|o| o.gust_kt)
        .max();
    match gust {
        Some(g) if g >= bounds::WIND_CRIT_GUST_KT => AlertLevel::Crit,
        Some(g) if g >= bounds::WIND_HIGH_GUST_KT => AlertLevel::High,
        Some(g) if g >= bounds::WIND_MED_GUST_KT => AlertLevel::Med,
        _ => AlertLevel::Ok,
    }
}

/// Snow pillar over the union of hazards and the worst-case fields
/// across both reports
fn snow_pillar(metar: Option<&ParsedObservation>, taf: Option<&ParsedObservation>) -> AlertLevel {
    let reports = || [metar, taf].into_iter().flatten();
    let has = |p: Phenomenon| reports().any(|o| o.hazards.contains(&p));

    if has(Phenomenon::Blsn) {
        return AlertLevel::Crit;
    }
    if !has(Phenomenon::Sn) {
        return AlertLevel::Ok;
    }

    let vis = reports().filter_map(|o| o.visibility_meters).min();
    let rvr = reports().filter_map(|o| o.rvr_meters).min();
    let ceiling = reports().filter_map(|o| o.ceiling_feet).min();

    let at_or_below = |value: Option<u32>, bound: u32| value.is_some_and(|v| v <= bound);
    let below = |value: Option<u32>, bound: u32| value.is_some_and(|v| v < bound);

    if at_or_below(vis, bounds::SNOW_CRIT_VIS_M)
        || at_or_below(rvr, bounds::SNOW_CRIT_RVR_M)
        || below(ceiling, bounds::SNOW_CRIT_CEILING_FT)
    {
        AlertLevel::Crit
    } else if at_or_below(vis, bounds::SNOW_HIGH_VIS_M)
        || at_or_below(rvr, bounds::SNOW_HIGH_RVR_M)
        || below(ceiling, bounds::SNOW_HIGH_CEILING_FT)
    {
        AlertLevel::High
    } else {
        AlertLevel::Med
    }
}
