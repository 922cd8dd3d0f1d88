//! Core report types: ReportKind, RawReport, ParsedObservation, Phenomenon

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::EngineError;

// ============================================================================
// Report Kind & Raw Input
// ============================================================================

/// Kind of coded weather report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKind {
    #[serde(rename = "METAR")]
    Metar,
    #[serde(rename = "TAF")]
    Taf,
}

impl ReportKind {
    /// Short code for logging and evidence entries
    pub fn short_code(&self) -> &'static str {
        match self {
            ReportKind::Metar => "METAR",
            ReportKind::Taf => "TAF",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// One raw coded report as received from an aviation weather source.
///
/// Construction goes through [`RawReport::new`], which validates the station
/// identifier (exactly 4 ASCII alphanumeric characters, stored uppercased)
/// and rejects empty report text. The fields are immutable afterwards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RawReport {
    kind: ReportKind,
    station: String,
    text: String,
}

impl RawReport {
    /// Validate and build a report. Fails fast on caller misuse; malformed
    /// report *content* is never an error — extractors handle that.
    pub fn new(kind: ReportKind, station: &str, text: &str) -> Result<Self, EngineError> {
        let station = station.trim();
        if station.len() != 4 || !station.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::InvalidStationId {
                ident: station.to_string(),
            });
        }
        let station = station.to_ascii_uppercase();
        if text.trim().is_empty() {
            return Err(EngineError::EmptyReport { station });
        }
        Ok(Self {
            kind,
            station,
            text: text.to_string(),
        })
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

// ============================================================================
// Coded Weather Phenomena
// ============================================================================

/// Coded weather phenomena recognized by the hazard scanner.
///
/// Variants are named after the report codes themselves. Combined groups in
/// a report (`-RASN`, `SHRASN`, `+FZRA`) raise every phenomenon they
/// contain, so `FZRA` also raises `Ra` and `BLSN` also raises `Sn` — the
/// severity bonuses downstream are additive by design of the scoring model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phenomenon {
    /// Thunderstorm
    #[serde(rename = "TS")]
    Ts,
    /// Cumulonimbus (standalone token or cloud-layer suffix)
    #[serde(rename = "CB")]
    Cb,
    /// Freezing fog
    #[serde(rename = "FZFG")]
    Fzfg,
    /// Fog
    #[serde(rename = "FG")]
    Fg,
    /// Mist
    #[serde(rename = "BR")]
    Br,
    /// Snow
    #[serde(rename = "SN")]
    Sn,
    /// Blowing snow
    #[serde(rename = "BLSN")]
    Blsn,
    /// Drifting snow
    #[serde(rename = "DRSN")]
    Drsn,
    /// Snow showers
    #[serde(rename = "SHSN")]
    Shsn,
    /// Freezing rain
    #[serde(rename = "FZRA")]
    Fzra,
    /// Freezing drizzle
    #[serde(rename = "FZDZ")]
    Fzdz,
    /// Rain
    #[serde(rename = "RA")]
    Ra,
    /// Drizzle
    #[serde(rename = "DZ")]
    Dz,
    /// Hail
    #[serde(rename = "GR")]
    Gr,
    /// Ice pellets
    #[serde(rename = "PL")]
    Pl,
    /// Small hail / snow pellets
    #[serde(rename = "GS")]
    Gs,
    /// Snow grains
    #[serde(rename = "SG")]
    Sg,
    /// Volcanic ash
    #[serde(rename = "VA")]
    Va,
}

impl Phenomenon {
    /// Report code for this phenomenon
    pub fn code(&self) -> &'static str {
        match self {
            Phenomenon::Ts => "TS",
            Phenomenon::Cb => "CB",
            Phenomenon::Fzfg => "FZFG",
            Phenomenon::Fg => "FG",
            Phenomenon::Br => "BR",
            Phenomenon::Sn => "SN",
            Phenomenon::Blsn => "BLSN",
            Phenomenon::Drsn => "DRSN",
            Phenomenon::Shsn => "SHSN",
            Phenomenon::Fzra => "FZRA",
            Phenomenon::Fzdz => "FZDZ",
            Phenomenon::Ra => "RA",
            Phenomenon::Dz => "DZ",
            Phenomenon::Gr => "GR",
            Phenomenon::Pl => "PL",
            Phenomenon::Gs => "GS",
            Phenomenon::Sg => "SG",
            Phenomenon::Va => "VA",
        }
    }

    /// All phenomena matched by substring containment on weather tokens.
    /// `Ts` is absent: thunderstorms need the start-anchored match to avoid
    /// false positives from codes merely containing "TS".
    pub const SUBSTRING_MATCHED: [Phenomenon; 17] = [
        Phenomenon::Cb,
        Phenomenon::Fzfg,
        Phenomenon::Fg,
        Phenomenon::Br,
        Phenomenon::Sn,
        Phenomenon::Blsn,
        Phenomenon::Drsn,
        Phenomenon::Shsn,
        Phenomenon::Fzra,
        Phenomenon::Fzdz,
        Phenomenon::Ra,
        Phenomenon::Dz,
        Phenomenon::Gr,
        Phenomenon::Pl,
        Phenomenon::Gs,
        Phenomenon::Sg,
        Phenomenon::Va,
    ];
}

impl std::fmt::Display for Phenomenon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Wind & Observation Time
// ============================================================================

/// Decoded wind group. Direction is absent for variable (`VRB`) winds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    /// True direction in degrees, absent for VRB
    pub dir_deg: Option<u16>,
    /// Sustained speed in knots
    pub speed_kt: u32,
    /// Gust in knots, if a G group is present
    pub gust_kt: Option<u32>,
}

impl Wind {
    /// Speed used for limit comparisons: gust when reported, else sustained.
    pub fn effective_speed_kt(&self) -> u32 {
        self.gust_kt.map_or(self.speed_kt, |g| g.max(self.speed_kt))
    }
}

/// Decoded `ddhhmmZ` observation/issue time group.
///
/// Reports carry only day-of-month, hour and minute — no month or year —
/// so this stays a plain struct rather than a calendar date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObsTime {
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

// ============================================================================
// Parsed Observation (per-report extraction result)
// ============================================================================

/// Typed fields extracted from one raw report.
///
/// Purely derived: evaluating the same report twice yields an identical
/// structure. Every field is optional — a report that lacks a group simply
/// contributes nothing downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParsedObservation {
    /// Minimum visibility in meters over all qualifying groups
    /// (for TAF: over the entire multi-period forecast text)
    pub visibility_meters: Option<u32>,
    /// Minimum runway visual range in meters across all RVR groups
    pub rvr_meters: Option<u32>,
    /// Lowest BKN/OVC/VV cloud base in feet (FEW/SCT never contribute)
    pub ceiling_feet: Option<u32>,
    /// Maximum gust in knots across all wind groups
    pub gust_kt: Option<u32>,
    /// Primary wind group (direction/speed/gust), used for crosswind geometry
    pub wind: Option<Wind>,
    /// Air temperature in whole degrees Celsius
    pub temperature_c: Option<i32>,
    /// Observation / issue time group
    pub observation_time: Option<ObsTime>,
    /// Coded phenomena present anywhere in the report
    pub hazards: BTreeSet<Phenomenon>,
    /// Heavy-precipitation tokens found (the subset that individually
    /// triggers takeoff prohibition): +SN, +GS, +SG, +PL, FZRA, +FZRA, GR, +GR
    pub heavy_precip_tokens: BTreeSet<String>,
}
