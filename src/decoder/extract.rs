//! Field extractors: one classified token stream in, typed optional fields out
//!
//! Every extractor is a total function — a field that cannot be found is
//! absent, never an error. Worst-case-wins aggregation throughout: minimum
//! visibility/RVR/ceiling, maximum gust. For TAF the whole multi-period
//! text is scanned, since any forecast period dropping below a threshold
//! matters operationally.

use std::collections::BTreeMap;
use tracing::debug;

use super::tokenizer::{classify, TokenShape, VIS_10KM};
use crate::types::{ParsedObservation, Phenomenon, RawReport};

/// Heavy-precipitation token vocabulary matched by literal containment.
/// FZRA and GR prohibit takeoff at any intensity; the rest only when heavy.
const HEAVY_SIGNED: [&str; 4] = ["+SN", "+GS", "+SG", "+PL"];

/// Which token produced each extracted field — feeds the evidence trail,
/// never the observation itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub visibility_token: Option<String>,
    pub rvr_token: Option<String>,
    pub ceiling_token: Option<String>,
    pub gust_token: Option<String>,
    pub wind_token: Option<String>,
    pub temperature_token: Option<String>,
    /// First token that raised each phenomenon
    pub hazard_tokens: BTreeMap<Phenomenon, String>,
    /// Canonical heavy-precip token → raw report token it was found in
    pub heavy_tokens: BTreeMap<String, String>,
}

/// A report together with its extraction result and provenance
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReport {
    pub report: RawReport,
    pub observation: ParsedObservation,
    pub provenance: Provenance,
}

/// Decode one raw report. Pure and idempotent: the same report always
/// yields an identical observation.
pub fn decode(report: RawReport) -> DecodedReport {
    let (observation, provenance) = extract(report.text());
    debug!(
        station = report.station(),
        kind = %report.kind(),
        visibility_m = observation.visibility_meters,
        rvr_m = observation.rvr_meters,
        ceiling_ft = observation.ceiling_feet,
        gust_kt = observation.gust_kt,
        hazards = observation.hazards.len(),
        "Report decoded"
    );
    DecodedReport {
        report,
        observation,
        provenance,
    }
}

/// Run all extractors over one report text
fn extract(text: &str) -> (ParsedObservation, Provenance) {
    let mut obs = ParsedObservation::default();
    let mut prov = Provenance::default();

    for token in classify(text) {
        match &token.shape {
            TokenShape::Cavok => {
                update_min(
                    &mut obs.visibility_meters,
                    &mut prov.visibility_token,
                    VIS_10KM,
                    token.text,
                );
            }
            TokenShape::VisibilityMeters(m) | TokenShape::VisibilityMiles { meters: m } => {
                update_min(
                    &mut obs.visibility_meters,
                    &mut prov.visibility_token,
                    *m,
                    token.text,
                );
            }
            TokenShape::Rvr { min_m, max_m, .. } => {
                update_min(&mut obs.rvr_meters, &mut prov.rvr_token, *min_m, token.text);
                if let Some(max_m) = max_m {
                    update_min(&mut obs.rvr_meters, &mut prov.rvr_token, *max_m, token.text);
                }
            }
            TokenShape::CloudLayer {
                amount,
                base_ft,
                cb,
            } => {
                if amount.is_ceiling() {
                    if let Some(base) = base_ft {
                        update_min(
                            &mut obs.ceiling_feet,
                            &mut prov.ceiling_token,
                            *base,
                            token.text,
                        );
                    }
                }
                // A CB suffix is shape-verified cumulonimbus evidence; the
                // substring scan never sees digit-bearing tokens.
                if *cb {
                    add_hazard(&mut obs, &mut prov, Phenomenon::Cb, token.text);
                }
            }
            TokenShape::Wind(wind) => {
                if obs.wind.is_none() {
                    obs.wind = Some(*wind);
                    prov.wind_token = Some(token.text.to_string());
                }
                if let Some(gust) = wind.gust_kt {
                    if obs.gust_kt.is_none_or(|g| gust > g) {
                        obs.gust_kt = Some(gust);
                        prov.gust_token = Some(token.text.to_string());
                    }
                }
            }
            TokenShape::TempDew { temperature_c, .. } => {
                if obs.temperature_c.is_none() {
                    obs.temperature_c = Some(*temperature_c);
                    prov.temperature_token = Some(token.text.to_string());
                }
            }
            TokenShape::DayTime(time) => {
                if obs.observation_time.is_none() {
                    obs.observation_time = Some(*time);
                }
            }
            TokenShape::Weather => {
                scan_weather_token(token.text, &mut obs, &mut prov);
            }
            TokenShape::ReportHeader
            | TokenShape::StationId
            | TokenShape::Validity
            | TokenShape::ChangeGroup
            | TokenShape::Other => {}
        }
    }

    (obs, prov)
}

fn update_min(
    slot: &mut Option<u32>,
    token_slot: &mut Option<String>,
    value: u32,
    token: &str,
) {
    if slot.is_none_or(|current| value < current) {
        *slot = Some(value);
        *token_slot = Some(token.to_string());
    }
}

fn add_hazard(
    obs: &mut ParsedObservation,
    prov: &mut Provenance,
    phenomenon: Phenomenon,
    token: &str,
) {
    if obs.hazards.insert(phenomenon) {
        prov.hazard_tokens
            .insert(phenomenon, token.to_string());
    }
}

/// Scan one isolated weather token for phenomena and heavy-precip matches.
///
/// Combined codes raise every phenomenon they contain (`-RASN` raises both
/// RA and SN; `FZFG` raises FZFG and FG). Thunderstorms are the exception:
/// only tokens *starting* with optionally-signed `TS` (or `VCTS`) match,
/// so codes merely containing "TS" stay silent.
fn scan_weather_token(text: &str, obs: &mut ParsedObservation, prov: &mut Provenance) {
    let body = text.trim_start_matches(['+', '-']);
    if body.starts_with("TS") || body.starts_with("VCTS") {
        add_hazard(obs, prov, Phenomenon::Ts, text);
    }
    for phenomenon in Phenomenon::SUBSTRING_MATCHED {
        if text.contains(phenomenon.code()) {
            add_hazard(obs, prov, phenomenon, text);
        }
    }

    for pattern in HEAVY_SIGNED {
        if text.contains(pattern) {
            record_heavy(obs, prov, pattern, text);
        }
    }
    if text.contains("FZRA") {
        let canonical = if text.contains("+FZRA") { "+FZRA" } else { "FZRA" };
        record_heavy(obs, prov, canonical, text);
    }
    if text.contains("GR") {
        let canonical = if text.contains("+GR") { "+GR" } else { "GR" };
        record_heavy(obs, prov, canonical, text);
    }
}

fn record_heavy(
    obs: &mut ParsedObservation,
    prov: &mut Provenance,
    canonical: &str,
    token: &str,
) {
    if obs.heavy_precip_tokens.insert(canonical.to_string()) {
        prov.heavy_tokens
            .insert(canonical.to_string(), token.to_string());
    }
}

/// Union of the hazards of both reports, attributing each phenomenon to
/// the report that raised it (METAR wins when both did). Used by the
/// policy evaluator for condition estimates and evidence.
pub fn union_hazards<'a>(
    metar: Option<&'a DecodedReport>,
    taf: Option<&'a DecodedReport>,
) -> BTreeMap<Phenomenon, (&'a DecodedReport, &'a str)> {
    let mut union: BTreeMap<Phenomenon, (&'a DecodedReport, &'a str)> = BTreeMap::new();
    for decoded in taf.into_iter().chain(metar) {
        for (&phenomenon, token) in &decoded.provenance.hazard_tokens {
            union.insert(phenomenon, (decoded, token.as_str()));
        }
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportKind;

    fn metar(text: &str) -> DecodedReport {
        decode(RawReport::new(ReportKind::Metar, "ENGM", text).unwrap())
    }

    fn taf(text: &str) -> DecodedReport {
        decode(RawReport::new(ReportKind::Taf, "ENGM", text).unwrap())
    }

    #[test]
    fn reference_scenario_decodes() {
        let d = metar("KXYZ 241200Z 27015G25KT 1/4SM R27/0400 -SN BKN003 M02/M05 A2990");
        let obs = &d.observation;
        assert_eq!(obs.visibility_meters, Some(402));
        assert_eq!(obs.rvr_meters, Some(400));
        assert_eq!(obs.ceiling_feet, Some(300));
        assert_eq!(obs.gust_kt, Some(25));
        assert!(obs.hazards.contains(&Phenomenon::Sn));
        assert_eq!(obs.temperature_c, Some(-2));
        assert!(obs.heavy_precip_tokens.is_empty());
    }

    #[test]
    fn cavok_yields_ten_km() {
        let d = metar("ENGM 241200Z 27010KT CAVOK 15/08 Q1020");
        assert_eq!(d.observation.visibility_meters, Some(10_000));
        assert_eq!(d.observation.ceiling_feet, None);
    }

    #[test]
    fn taf_visibility_is_minimum_across_periods() {
        let d = taf(
            "TAF ENGM 241100Z 2412/2512 27012KT 9999 SCT030 \
             BECMG 2418/2420 4000 -RA \
             TEMPO 2500/2506 1600 BR",
        );
        assert_eq!(d.observation.visibility_meters, Some(1600));
    }

    #[test]
    fn validity_ranges_do_not_pollute_visibility() {
        let d = taf("TAF ENGM 301100Z 3012/3112 27012KT 9999 SCT030");
        assert_eq!(d.observation.visibility_meters, Some(10_000));
    }

    #[test]
    fn rvr_minimum_spans_groups_and_variability() {
        let d = metar("ENGM 241200Z 0200 R01L/0450V0700 R19R/0300U FZFG");
        assert_eq!(d.observation.rvr_meters, Some(300));
    }

    #[test]
    fn ceiling_ignores_few_and_sct() {
        let d = metar("ENGM 241200Z 9999 FEW002 SCT005 BKN012 OVC020");
        assert_eq!(d.observation.ceiling_feet, Some(1200));
        let d = metar("ENGM 241200Z 9999 FEW002 SCT005");
        assert_eq!(d.observation.ceiling_feet, None);
    }

    #[test]
    fn vertical_visibility_is_a_ceiling() {
        let d = metar("ENGM 241200Z 0100 VV001 FZFG");
        assert_eq!(d.observation.ceiling_feet, Some(100));
    }

    #[test]
    fn gust_is_maximum_across_wind_groups() {
        let d = taf(
            "TAF ENGM 241100Z 2412/2512 27012G30KT 9999 SCT030 \
             BECMG 2418/2420 30020G45KT",
        );
        assert_eq!(d.observation.gust_kt, Some(45));
        // primary wind group retained for crosswind geometry
        assert_eq!(d.observation.wind.map(|w| w.speed_kt), Some(12));
    }

    #[test]
    fn station_identifier_never_raises_hazards() {
        // Identifier ends in "TS"; the report itself is benign.
        let d = decode(
            RawReport::new(ReportKind::Metar, "LTTS", "LTTS 241200Z 27010KT 9999 FEW030 15/08")
                .unwrap(),
        );
        assert!(d.observation.hazards.is_empty());
        // Same for a report with an explicit header keyword.
        let d = decode(
            RawReport::new(ReportKind::Metar, "LTTS", "METAR LTTS 241200Z 27010KT 9999 15/08")
                .unwrap(),
        );
        assert!(d.observation.hazards.is_empty());
    }

    #[test]
    fn thunderstorm_requires_anchored_match() {
        let d = metar("ENGM 241200Z 27010KT 5000 +TSRA BKN020CB 18/12");
        assert!(d.observation.hazards.contains(&Phenomenon::Ts));
        assert!(d.observation.hazards.contains(&Phenomenon::Cb));
        // VCTS counts
        let d = metar("ENGM 241200Z 27010KT 9999 VCTS SCT030 18/12");
        assert!(d.observation.hazards.contains(&Phenomenon::Ts));
        // Tokens merely containing "TS" do not
        let d = metar("ENGM 241200Z 27010KT 9999 RETSRA 18/12");
        assert!(!d.observation.hazards.contains(&Phenomenon::Ts));
    }

    #[test]
    fn combined_codes_raise_all_contained_phenomena() {
        let d = metar("ENGM 241200Z 27010KT 2000 -RASN BR BKN008 01/M01");
        let h = &d.observation.hazards;
        assert!(h.contains(&Phenomenon::Ra));
        assert!(h.contains(&Phenomenon::Sn));
        assert!(h.contains(&Phenomenon::Br));
        // FZFG raises both FZFG and FG
        let d = metar("ENGM 241200Z 0100 FZFG VV001 M03/M03");
        assert!(d.observation.hazards.contains(&Phenomenon::Fzfg));
        assert!(d.observation.hazards.contains(&Phenomenon::Fg));
    }

    #[test]
    fn heavy_precip_vocabulary() {
        let cases = [
            ("+SN", "+SN"),
            ("+GS", "+GS"),
            ("+SG", "+SG"),
            ("+PL", "+PL"),
            ("FZRA", "FZRA"),
            ("+FZRA", "+FZRA"),
            ("GR", "GR"),
            ("+GR", "+GR"),
        ];
        for (code, canonical) in cases {
            let d = metar(&format!("ENGM 241200Z 27010KT 3000 {code} BKN010 00/M02"));
            assert!(
                d.observation.heavy_precip_tokens.contains(canonical),
                "{code} should record {canonical}"
            );
        }
        // Moderate snow is not heavy
        let d = metar("ENGM 241200Z 27010KT 3000 SN BKN010 00/M02");
        assert!(d.observation.heavy_precip_tokens.is_empty());
        // Heavy shower hail still prohibits via GR
        let d = metar("ENGM 241200Z 27010KT 3000 +SHGR BKN010 05/01");
        assert!(d.observation.heavy_precip_tokens.contains("GR"));
    }

    #[test]
    fn observation_time_decodes() {
        let d = metar("ENGM 241200Z 27010KT 9999 15/08");
        let t = d.observation.observation_time.unwrap();
        assert_eq!((t.day, t.hour, t.minute), (24, 12, 0));
    }

    #[test]
    fn decode_is_idempotent() {
        let report = RawReport::new(
            ReportKind::Metar,
            "ENGM",
            "ENGM 241200Z 27015G25KT 0350 R01L/0250 FZFG VV001 M05/M06",
        )
        .unwrap();
        let a = decode(report.clone());
        let b = decode(report);
        assert_eq!(a.observation, b.observation);
        assert_eq!(a.provenance, b.provenance);
    }

    #[test]
    fn malformed_text_extracts_nothing_and_never_panics() {
        for text in ["%%% ???", "R/// G KT SM", "1", "////// /////"] {
            let d = decode(RawReport::new(ReportKind::Metar, "ENGM", text).unwrap());
            assert_eq!(d.observation.visibility_meters, None);
            assert_eq!(d.observation.rvr_meters, None);
            assert_eq!(d.observation.ceiling_feet, None);
        }
    }
}
