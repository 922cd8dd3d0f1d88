//! METAR/TAF token stream
//!
//! Reports are whitespace-delimited, position-and-token-dependent text.
//! A single shape dispatch classifies every token once, so downstream
//! extractors never apply competing pattern matches to the same raw string.
//! This is what keeps TAF validity ranges (`3012/3112`) and RVR groups
//! (`R27/0600`) out of visibility scanning, and station identifiers out of
//! hazard scanning — by construction, not by regex ordering.

use crate::types::{ObsTime, Wind};

/// Meters per statute mile, used for `SM` visibility conversion
const METERS_PER_STATUTE_MILE: f64 = 1609.34;

/// The "10 km or more" sentinel value
const VIS_SENTINEL: u32 = 9999;

/// Value the sentinel decodes to (and CAVOK implies)
pub const VIS_10KM: u32 = 10_000;

/// Report-type header tokens stripped before hazard scanning
const HEADER_TOKENS: [&str; 8] = ["METAR", "SPECI", "TAF", "AUTO", "COR", "AMD", "CNL", "NIL"];

/// Longest token the weather scanner will look at
const MAX_WEATHER_TOKEN_LEN: usize = 10;

// ============================================================================
// Token Shapes
// ============================================================================

/// Cloud amount of a cloud-layer group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudAmount {
    Few,
    Sct,
    Bkn,
    Ovc,
    /// Vertical visibility (sky obscured)
    Vv,
}

impl CloudAmount {
    /// Only broken, overcast, and vertical visibility constitute a ceiling.
    /// FEW/SCT are cloud amount, never ceiling.
    pub fn is_ceiling(&self) -> bool {
        matches!(self, CloudAmount::Bkn | CloudAmount::Ovc | CloudAmount::Vv)
    }
}

/// Classified shape of one report token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenShape {
    /// METAR/SPECI/TAF/AUTO/COR/AMD/CNL/NIL keyword
    ReportHeader,
    /// The 4-letter station identifier at the head of the report
    StationId,
    /// `ddhhmmZ` observation/issue time
    DayTime(ObsTime),
    /// `<ddd|VRB><ff>[Gff]KT` wind group
    Wind(Wind),
    /// `CAVOK` (implies 10 km visibility)
    Cavok,
    /// Bare 4-digit visibility in meters (9999 decoded to 10 000)
    VisibilityMeters(u32),
    /// Statute-mile visibility, already converted to meters
    VisibilityMiles { meters: u32 },
    /// `R<rwy></>...` runway visual range group
    Rvr {
        runway: String,
        min_m: u32,
        max_m: Option<u32>,
    },
    /// `FEW|SCT|BKN|OVC|VV` cloud group; base absent when reported `///`
    CloudLayer {
        amount: CloudAmount,
        base_ft: Option<u32>,
        cb: bool,
    },
    /// `M?dd/M?dd` temperature/dewpoint group
    TempDew {
        temperature_c: i32,
        dewpoint_c: Option<i32>,
    },
    /// `dddd/dddd` TAF validity range
    Validity,
    /// `BECMG|TEMPO|INTER|FMdddddd|PROBdd` forecast change marker
    ChangeGroup,
    /// Isolated weather-code candidate (no digits, no unit suffix, ≤ 10 chars)
    Weather,
    /// Anything else (pressure groups, remarks data, unparsed)
    Other,
}

/// One classified token with its byte offset into the report text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
    pub shape: TokenShape,
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Split a report on whitespace, keeping byte offsets for evidence snippets.
pub fn tokenize(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push((s, &text[s..]));
    }
    tokens
}

/// Tokenize and classify a whole report. Total: malformed tokens classify
/// as `Other`, never as an error.
pub fn classify(text: &str) -> Vec<Token<'_>> {
    let raw = tokenize(text);
    let mut tokens: Vec<Token<'_>> = Vec::with_capacity(raw.len());

    let mut idx = 0;
    // Leading header run (METAR, TAF AMD, ...)
    while idx < raw.len() && is_header_keyword(raw[idx].1) {
        tokens.push(token(raw[idx], TokenShape::ReportHeader));
        idx += 1;
    }
    // The station identifier immediately follows the header run; reports
    // with no header keyword lead with the identifier directly. Stripping
    // it here is what keeps hazard-like identifiers (ending in "TS" etc.)
    // out of the weather scan.
    if idx < raw.len() && is_station_ident(raw[idx].1) {
        tokens.push(token(raw[idx], TokenShape::StationId));
        idx += 1;
    }

    while idx < raw.len() {
        let (_, t) = raw[idx];

        // Split statute-mile form: a whole-mile digit followed by a
        // fraction token ("1 1/2SM"). Consumes both tokens.
        if idx + 1 < raw.len() && is_whole_mile_prefix(t) {
            let (_, next) = raw[idx + 1];
            if next.contains('/') {
                if let Some(frac_miles) = parse_statute_miles(next) {
                    // whole-mile prefix is 1-2 digits, parse cannot fail
                    let whole: f64 = t.parse().unwrap_or(0.0);
                    tokens.push(token(raw[idx], TokenShape::Other));
                    tokens.push(token(
                        raw[idx + 1],
                        TokenShape::VisibilityMiles {
                            meters: miles_to_meters(whole + frac_miles),
                        },
                    ));
                    idx += 2;
                    continue;
                }
            }
        }

        let shape = classify_one(t);
        tokens.push(token(raw[idx], shape));
        idx += 1;
    }

    tokens
}

fn token<'a>((offset, text): (usize, &'a str), shape: TokenShape) -> Token<'a> {
    Token { text, offset, shape }
}

/// Shape dispatch for a single mid-report token
fn classify_one(t: &str) -> TokenShape {
    if is_header_keyword(t) {
        // AUTO/COR/AMD also appear mid-report after the time group
        return TokenShape::ReportHeader;
    }
    if t == "CAVOK" {
        return TokenShape::Cavok;
    }
    if let Some(time) = parse_day_time(t) {
        return TokenShape::DayTime(time);
    }
    if let Some(wind) = parse_wind(t) {
        return TokenShape::Wind(wind);
    }
    if is_validity_range(t) {
        return TokenShape::Validity;
    }
    if let Some((runway, min_m, max_m)) = parse_rvr(t) {
        return TokenShape::Rvr { runway, min_m, max_m };
    }
    if let Some(meters) = parse_vis_meters(t) {
        return TokenShape::VisibilityMeters(meters);
    }
    if t.ends_with("SM") {
        if let Some(miles) = parse_statute_miles(t) {
            return TokenShape::VisibilityMiles {
                meters: miles_to_meters(miles),
            };
        }
    }
    if let Some((amount, base_ft, cb)) = parse_cloud(t) {
        return TokenShape::CloudLayer { amount, base_ft, cb };
    }
    if let Some((temperature_c, dewpoint_c)) = parse_temp_dew(t) {
        return TokenShape::TempDew {
            temperature_c,
            dewpoint_c,
        };
    }
    if is_change_group(t) {
        return TokenShape::ChangeGroup;
    }
    if is_weather_candidate(t) {
        return TokenShape::Weather;
    }
    TokenShape::Other
}

// ============================================================================
// Token Predicates & Parsers (all total)
// ============================================================================

fn is_header_keyword(t: &str) -> bool {
    HEADER_TOKENS.contains(&t)
}

fn is_station_ident(t: &str) -> bool {
    t.len() == 4 && t.chars().all(|c| c.is_ascii_uppercase())
}

/// Whole-mile prefix of the split statute-mile form ("1" in "1 1/2SM")
fn is_whole_mile_prefix(t: &str) -> bool {
    (1..=2).contains(&t.len()) && t.chars().all(|c| c.is_ascii_digit())
}

/// `dddd/dddd` TAF validity range — must never reach visibility scanning
fn is_validity_range(t: &str) -> bool {
    match t.split_once('/') {
        Some((a, b)) => {
            a.len() == 4
                && b.len() == 4
                && a.chars().all(|c| c.is_ascii_digit())
                && b.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn is_change_group(t: &str) -> bool {
    if matches!(t, "BECMG" | "TEMPO" | "INTER") {
        return true;
    }
    if let Some(rest) = t.strip_prefix("FM") {
        return (rest.len() == 4 || rest.len() == 6) && rest.chars().all(|c| c.is_ascii_digit());
    }
    if let Some(rest) = t.strip_prefix("PROB") {
        return rest.len() == 2 && rest.chars().all(|c| c.is_ascii_digit());
    }
    false
}

/// Isolated weather-code candidate: no digits, no `/`, no unit suffix,
/// only code characters and intensity prefixes, bounded length.
fn is_weather_candidate(t: &str) -> bool {
    (2..=MAX_WEATHER_TOKEN_LEN).contains(&t.len())
        && t.chars()
            .all(|c| c.is_ascii_uppercase() || c == '+' || c == '-')
}

/// `ddhhmmZ` observation/issue time
fn parse_day_time(t: &str) -> Option<ObsTime> {
    let digits = t.strip_suffix('Z')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u8 = digits[0..2].parse().ok()?;
    let hour: u8 = digits[2..4].parse().ok()?;
    let minute: u8 = digits[4..6].parse().ok()?;
    if !(1..=31).contains(&day) || hour > 23 || minute > 59 {
        return None;
    }
    Some(ObsTime { day, hour, minute })
}

/// `<ddd|VRB><ff[f]>[G<ff[f]>]KT` wind group
fn parse_wind(t: &str) -> Option<Wind> {
    let rest = t.strip_suffix("KT")?;
    let (dir_deg, rest) = if let Some(r) = rest.strip_prefix("VRB") {
        (None, r)
    } else {
        if rest.len() < 3 {
            return None;
        }
        let (d, r) = rest.split_at(3);
        if !d.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let deg: u16 = d.parse().ok()?;
        if deg > 360 {
            return None;
        }
        (Some(deg % 360), r)
    };
    let (speed_part, gust_part) = match rest.split_once('G') {
        Some((s, g)) => (s, Some(g)),
        None => (rest, None),
    };
    let speed_kt = parse_wind_number(speed_part)?;
    let gust_kt = match gust_part {
        Some(g) => Some(parse_wind_number(g)?),
        None => None,
    };
    Some(Wind {
        dir_deg,
        speed_kt,
        gust_kt,
    })
}

fn parse_wind_number(s: &str) -> Option<u32> {
    if !(2..=3).contains(&s.len()) || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Bare 4-digit meters visibility; 9999 is the "10 km or more" sentinel
fn parse_vis_meters(t: &str) -> Option<u32> {
    if t.len() != 4 || !t.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let v: u32 = t.parse().ok()?;
    Some(if v == VIS_SENTINEL { VIS_10KM } else { v })
}

/// Statute-mile token ("P6SM", "2SM", "M1/4SM", "1/2SM") → miles
fn parse_statute_miles(t: &str) -> Option<f64> {
    let body = t.strip_suffix("SM")?;
    // P (greater than) / M (less than) prefixes carry the bare value
    let body = body.strip_prefix(['P', 'M']).unwrap_or(body);
    if body.is_empty() {
        return None;
    }
    if let Some((num, den)) = body.split_once('/') {
        let num: f64 = parse_mile_digits(num)?;
        let den: f64 = parse_mile_digits(den)?;
        if den == 0.0 {
            return None;
        }
        Some(num / den)
    } else {
        parse_mile_digits(body)
    }
}

fn parse_mile_digits(s: &str) -> Option<f64> {
    if s.is_empty() || s.len() > 2 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn miles_to_meters(miles: f64) -> u32 {
    (miles * METERS_PER_STATUTE_MILE).round() as u32
}

/// `R<rwy><L|R|C?>/<[PM]?dddd>[V<[PM]?dddd>]<U|D|N?>` runway visual range.
/// Anything with trailing junk (e.g. a `FT` unit) deliberately fails —
/// the grammar here is the guard, not a best-effort salvage.
fn parse_rvr(t: &str) -> Option<(String, u32, Option<u32>)> {
    let rest = t.strip_prefix('R')?;
    let digit_count = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_count != 2 {
        return None;
    }
    let (num, rest) = rest.split_at(2);
    let (side, rest) = match rest.strip_prefix(['L', 'R', 'C']) {
        Some(r) => (&rest[..1], r),
        None => ("", rest),
    };
    let rest = rest.strip_prefix('/')?;
    let (min_m, rest) = parse_rvr_value(rest)?;
    let (max_m, rest) = match rest.strip_prefix('V') {
        Some(r) => {
            let (v, r) = parse_rvr_value(r)?;
            (Some(v), r)
        }
        None => (None, rest),
    };
    // optional trend indicator
    let rest = rest.strip_prefix(['U', 'D', 'N']).unwrap_or(rest);
    if !rest.is_empty() {
        return None;
    }
    Some((format!("{num}{side}"), min_m, max_m))
}

/// One RVR value: optional P/M prefix, exactly 4 digits
fn parse_rvr_value(s: &str) -> Option<(u32, &str)> {
    let s = s.strip_prefix(['P', 'M']).unwrap_or(s);
    if s.len() < 4 || !s[..4].chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: u32 = s[..4].parse().ok()?;
    Some((value, &s[4..]))
}

/// `FEW|SCT|BKN|OVC<ddd>[CB|TCU]` or `VV<ddd>` cloud group;
/// `///` base (not measured) yields an absent base
fn parse_cloud(t: &str) -> Option<(CloudAmount, Option<u32>, bool)> {
    let (amount, rest) = if let Some(r) = t.strip_prefix("FEW") {
        (CloudAmount::Few, r)
    } else if let Some(r) = t.strip_prefix("SCT") {
        (CloudAmount::Sct, r)
    } else if let Some(r) = t.strip_prefix("BKN") {
        (CloudAmount::Bkn, r)
    } else if let Some(r) = t.strip_prefix("OVC") {
        (CloudAmount::Ovc, r)
    } else if let Some(r) = t.strip_prefix("VV") {
        (CloudAmount::Vv, r)
    } else {
        return None;
    };
    if rest.len() < 3 {
        return None;
    }
    let (base, suffix) = rest.split_at(3);
    let base_ft = if base == "///" {
        None
    } else if base.chars().all(|c| c.is_ascii_digit()) {
        // parse of 3 ASCII digits cannot fail
        Some(base.parse::<u32>().ok()? * 100)
    } else {
        return None;
    };
    let cb = match suffix {
        "CB" => true,
        "" | "TCU" => false,
        _ => return None,
    };
    Some((amount, base_ft, cb))
}

/// `M?dd/M?dd` temperature/dewpoint; `M` prefix denotes negative.
/// The dewpoint may be missing (`10/`), the temperature may not.
fn parse_temp_dew(t: &str) -> Option<(i32, Option<i32>)> {
    let (temp, dew) = t.split_once('/')?;
    let temperature_c = parse_signed_temp(temp)?;
    let dewpoint_c = if dew.is_empty() {
        None
    } else {
        Some(parse_signed_temp(dew)?)
    };
    Some((temperature_c, dewpoint_c))
}

fn parse_signed_temp(s: &str) -> Option<i32> {
    let (negative, digits) = match s.strip_prefix('M') {
        Some(d) => (true, d),
        None => (false, s),
    };
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let v: i32 = digits.parse().ok()?;
    Some(if negative { -v } else { v })
}
