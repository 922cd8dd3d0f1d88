//! Per-report additive severity score (0-100)
//!
//! Band tables contribute the first (tightest) matching band; hazard and
//! gust bonuses stack additively. The engine-ice-ops condition — METAR
//! visibility at or below 150 m with freezing fog — overrides the additive
//! total entirely.

use crate::types::severity_bands as bands;
use crate::types::{ParsedObservation, Phenomenon};

/// Additive severity score for one report, capped at 100.
pub fn score_report(obs: &ParsedObservation) -> u8 {
    let mut total: u32 = 0;

    if let Some(vis) = obs.visibility_meters {
        total += u32::from(band_at_or_below(vis, &bands::VISIBILITY));
    }
    if let Some(rvr) = obs.rvr_meters {
        total += u32::from(band_at_or_below(rvr, &bands::RVR));
    }
    if let Some(ceiling) = obs.ceiling_feet {
        total += u32::from(band_below(ceiling, &bands::CEILING));
    }

    total += u32::from(hazard_bonus(obs));

    if let Some(gust) = obs.gust_kt {
        for &(threshold, points) in &bands::GUST {
            if gust >= threshold {
                total += u32::from(points);
                break;
            }
        }
    }

    total.min(u32::from(bands::MAX_SCORE)) as u8
}

/// Engine ice ops: visibility ≤ 150 m with freezing fog on the METAR.
/// Forces the station score to 100 regardless of the additive total.
pub fn engine_ice_ops(metar: &ParsedObservation) -> bool {
    metar
        .visibility_meters
        .is_some_and(|v| v <= bands::ENGINE_ICE_VIS_M)
        && metar.hazards.contains(&Phenomenon::Fzfg)
}

/// First band whose inclusive upper bound covers the value
fn band_at_or_below(value: u32, table: &[(u32, u8)]) -> u8 {
    table
        .iter()
        .find(|&&(bound, _)| value <= bound)
        .map_or(0, |&(_, points)| points)
}

/// First band whose exclusive upper bound covers the value
fn band_below(value: u32, table: &[(u32, u8)]) -> u8 {
    table
        .iter()
        .find(|&&(bound, _)| value < bound)
        .map_or(0, |&(_, points)| points)
}

fn hazard_bonus(obs: &ParsedObservation) -> u8 {
    let mut bonus: u8 = 0;
    let has = |p: Phenomenon| obs.hazards.contains(&p);
    if has(Phenomenon::Ts) {
        bonus += bands::TS_BONUS;
    }
    if has(Phenomenon::Cb) {
        bonus += bands::CB_BONUS;
    }
    if has(Phenomenon::Fzfg) {
        bonus += bands::FZFG_BONUS;
    }
    if has(Phenomenon::Fg) {
        bonus += bands::FG_BONUS;
    }
    if has(Phenomenon::Sn) {
        bonus += bands::SN_BONUS;
    }
    if has(Phenomenon::Ra) || has(Phenomenon::Dz) {
        bonus += bands::RAIN_BONUS;
    }
    if has(Phenomenon::Br) {
        bonus += bands::BR_BONUS;
    }
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn obs() -> ParsedObservation {
        ParsedObservation::default()
    }

    #[test]
    fn visibility_bands_are_tightest_first() {
        let cases = [
            (100, 35),
            (150, 35),
            (151, 30),
            (175, 30),
            (250, 26),
            (300, 24),
            (500, 18),
            (550, 16),
            (800, 12),
            (801, 0),
            (10_000, 0),
        ];
        for (vis, expected) in cases {
            let mut o = obs();
            o.visibility_meters = Some(vis);
            assert_eq!(score_report(&o), expected, "visibility {vis}");
        }
    }

    #[test]
    fn rvr_and_ceiling_bands() {
        let mut o = obs();
        o.rvr_meters = Some(75);
        assert_eq!(score_report(&o), 28);
        o.rvr_meters = Some(500);
        assert_eq!(score_report(&o), 12);
        o.rvr_meters = Some(501);
        assert_eq!(score_report(&o), 0);

        let mut o = obs();
        o.ceiling_feet = Some(499);
        assert_eq!(score_report(&o), 22);
        // ceiling bands are exclusive: exactly 500 ft is the 800 band
        o.ceiling_feet = Some(500);
        assert_eq!(score_report(&o), 12);
        o.ceiling_feet = Some(800);
        assert_eq!(score_report(&o), 0);
    }

    #[test]
    fn hazard_bonuses_stack_additively() {
        let mut o = obs();
        o.hazards = BTreeSet::from([Phenomenon::Ts, Phenomenon::Cb, Phenomenon::Br]);
        assert_eq!(score_report(&o), 22 + 12 + 6);
        // freezing fog implies fog via the combined-code scan: both stack
        let mut o = obs();
        o.hazards = BTreeSet::from([Phenomenon::Fzfg, Phenomenon::Fg]);
        assert_eq!(score_report(&o), 18 + 14);
        // rain and drizzle together earn the category bonus once
        let mut o = obs();
        o.hazards = BTreeSet::from([Phenomenon::Ra, Phenomenon::Dz]);
        assert_eq!(score_report(&o), 8);
    }

    #[test]
    fn gust_bonus_single_band() {
        let mut o = obs();
        o.gust_kt = Some(24);
        assert_eq!(score_report(&o), 0);
        o.gust_kt = Some(25);
        assert_eq!(score_report(&o), 4);
        o.gust_kt = Some(30);
        assert_eq!(score_report(&o), 6);
        o.gust_kt = Some(40);
        assert_eq!(score_report(&o), 10);
    }

    #[test]
    fn score_caps_at_100() {
        let mut o = obs();
        o.visibility_meters = Some(100);
        o.rvr_meters = Some(50);
        o.ceiling_feet = Some(100);
        o.gust_kt = Some(45);
        o.hazards = BTreeSet::from([
            Phenomenon::Ts,
            Phenomenon::Cb,
            Phenomenon::Fzfg,
            Phenomenon::Fg,
            Phenomenon::Sn,
            Phenomenon::Ra,
            Phenomenon::Br,
        ]);
        assert_eq!(score_report(&o), 100);
    }

    #[test]
    fn engine_ice_condition() {
        let mut o = obs();
        o.visibility_meters = Some(150);
        o.hazards = BTreeSet::from([Phenomenon::Fzfg, Phenomenon::Fg]);
        assert!(engine_ice_ops(&o));
        o.visibility_meters = Some(151);
        assert!(!engine_ice_ops(&o));
        o.visibility_meters = Some(100);
        o.hazards = BTreeSet::from([Phenomenon::Fg]);
        assert!(!engine_ice_ops(&o));
    }
}
