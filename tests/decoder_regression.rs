//! Decoder Regression Tests
//!
//! Exercises the tokenizer and field extractors over realistic report
//! texts. Asserts the decoding properties the policy layer depends on:
//! 4-digit visibility decode, worst-case aggregation, slash-token guards,
//! station-identifier immunity, and idempotence.

use metops::{decode, Phenomenon, RawReport, ReportKind};

fn metar(text: &str) -> metops::DecodedReport {
    decode(RawReport::new(ReportKind::Metar, "ENGM", text).unwrap())
}

fn taf(text: &str) -> metops::DecodedReport {
    decode(RawReport::new(ReportKind::Taf, "ENGM", text).unwrap())
}

/// Every 4-digit token 0000..=9998 decodes to itself; 9999 is the
/// "10 km or more" sentinel.
#[test]
fn four_digit_visibility_decodes_exactly() {
    for value in (0..=9998).step_by(7) {
        let d = metar(&format!("ENGM 241200Z 27010KT {value:04} FEW030 15/08"));
        assert_eq!(
            d.observation.visibility_meters,
            Some(value),
            "token {value:04}"
        );
    }
    let d = metar("ENGM 241200Z 27010KT 9999 FEW030 15/08");
    assert_eq!(d.observation.visibility_meters, Some(10_000));
}

/// The worked reference scenario from the operating-manual review.
#[test]
fn reference_metar_scenario() {
    let d = metar("KXYZ 241200Z 27015G25KT 1/4SM R27/0400 -SN BKN003 M02/M05 A2990");
    let obs = &d.observation;
    assert_eq!(obs.visibility_meters, Some(402));
    assert_eq!(obs.rvr_meters, Some(400));
    assert_eq!(obs.ceiling_feet, Some(300));
    assert_eq!(obs.gust_kt, Some(25));
    assert!(obs.hazards.contains(&Phenomenon::Sn));
    assert_eq!(obs.temperature_c, Some(-2));
}

/// A TAF with 9999 in one period and 1600 in another decodes the worst.
#[test]
fn taf_worst_visibility_wins() {
    let d = taf(
        "TAF ENGM 241100Z 2412/2512 27012KT 9999 SCT030 \
         TEMPO 2418/2424 1600 -SN BKN008 \
         BECMG 2500/2502 9999 NSW",
    );
    assert_eq!(d.observation.visibility_meters, Some(1600));
}

/// Validity ranges and RVR groups contain '/' and must never be read as
/// visibility; the pressure group must not be read as anything.
#[test]
fn slash_and_pressure_tokens_are_guarded() {
    let d = taf("TAF ENGM 301100Z 3012/3112 27012KT 9999 SCT030");
    assert_eq!(d.observation.visibility_meters, Some(10_000));

    let d = metar("ENGM 241200Z 27010KT 9999 R01L/0600 FEW030 15/08 Q1021");
    assert_eq!(d.observation.visibility_meters, Some(10_000));
    assert_eq!(d.observation.rvr_meters, Some(600));
}

/// Statute-mile forms, including the split two-token form.
#[test]
fn statute_mile_visibility_forms() {
    let cases = [
        ("P6SM", 9656),
        ("2SM", 3219),
        ("M1/4SM", 402),
        ("1/2SM", 805),
        ("1 1/2SM", 2414),
    ];
    for (form, expected) in cases {
        let d = metar(&format!("KXYZ 241200Z 27010KT {form} FEW030 15/08"));
        assert_eq!(
            d.observation.visibility_meters,
            Some(expected),
            "form {form:?}"
        );
    }
}

/// RVR minimum spans all groups and variability ranges in both reports.
#[test]
fn rvr_minimum_aggregation() {
    let d = metar(
        "ENGM 241200Z 33006KT 0300 R01L/0450V0800U R01R/0250N R19L/P1500 FZFG VV002 M04/M04",
    );
    assert_eq!(d.observation.rvr_meters, Some(250));
}

/// FEW/SCT are cloud amount, never ceiling; BKN/OVC/VV are.
#[test]
fn ceiling_group_selection() {
    let d = metar("ENGM 241200Z 27010KT 9999 FEW005 SCT008 15/08");
    assert_eq!(d.observation.ceiling_feet, None);
    let d = metar("ENGM 241200Z 27010KT 9999 FEW005 BKN012 OVC018 15/08");
    assert_eq!(d.observation.ceiling_feet, Some(1200));
    let d = metar("ENGM 241200Z 27010KT 0200 VV001 FZFG M02/M02");
    assert_eq!(d.observation.ceiling_feet, Some(100));
}

/// Hazard scanning never fires from the station identifier, with or
/// without a report-type header keyword.
#[test]
fn station_identifier_immunity() {
    for text in [
        "LTTS 241200Z 27010KT 9999 FEW030 15/08",
        "METAR LTTS 241200Z 27010KT 9999 FEW030 15/08",
        "SPECI LTTS 241200Z 27010KT 9999 FEW030 15/08",
        "TAF AMD LTTS 241100Z 2412/2512 27012KT 9999 SCT030",
    ] {
        let kind = if text.starts_with("TAF") {
            ReportKind::Taf
        } else {
            ReportKind::Metar
        };
        let d = decode(RawReport::new(kind, "LTTS", text).unwrap());
        assert!(
            d.observation.hazards.is_empty(),
            "identifier leaked into hazards for {text:?}"
        );
    }
}

/// Thunderstorm detection is start-anchored; combined codes raise every
/// phenomenon they contain.
#[test]
fn hazard_scan_rules() {
    let d = metar("ENGM 241200Z 21018G35KT 4000 +TSRA SCT020CB BKN040 18/16");
    assert!(d.observation.hazards.contains(&Phenomenon::Ts));
    assert!(d.observation.hazards.contains(&Phenomenon::Ra));
    assert!(d.observation.hazards.contains(&Phenomenon::Cb));

    let d = metar("ENGM 241200Z 00000KT 0150 FZFG BLSN M08/M09");
    for p in [
        Phenomenon::Fzfg,
        Phenomenon::Fg,
        Phenomenon::Blsn,
        Phenomenon::Sn,
    ] {
        assert!(d.observation.hazards.contains(&p), "{p} missing");
    }
}

/// Bit-identical extraction on repeated evaluation of the same report.
#[test]
fn decoding_is_idempotent() {
    let report = RawReport::new(
        ReportKind::Metar,
        "ENGM",
        "ENGM 241200Z 27015G25KT 0350 R01L/0250V0400D FZFG VV001 M05/M06 Q1021",
    )
    .unwrap();
    let first = decode(report.clone());
    let second = decode(report);
    assert_eq!(first.observation, second.observation);
    assert_eq!(first.provenance, second.provenance);
}

/// Extractors are total: garbage in, absence out, never a panic.
#[test]
fn malformed_reports_extract_gracefully() {
    for text in [
        "x",
        "!!!! @@@@ ####",
        "ENGM",
        "ENGM 241200Z",
        "ENGM 999999Z ///// R//:// 12345678901",
    ] {
        let d = decode(RawReport::new(ReportKind::Metar, "ENGM", text).unwrap());
        assert_eq!(d.observation.rvr_meters, None);
        assert_eq!(d.observation.gust_kt, None);
    }
}
