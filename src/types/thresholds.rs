//! Severity bands, alert boundaries, OM limits, and the crosswind limit table
//!
//! All thresholds are carried over verbatim from the operating-manual
//! heuristics, including the TAF 0.85 discount and the strict `<` boundary
//! semantics at 400 m (LVP) and 125 m (RVR absolute minimum).

/// Additive severity bands and bonuses. Band tables are ordered tightest
/// first and evaluated top-down: the first matching band contributes its
/// points; hazard bonuses stack additively, not hierarchically.
pub mod severity_bands {
    /// Visibility bands (meters, inclusive upper bound → points)
    pub const VISIBILITY: [(u32, u8); 7] = [
        (150, 35),
        (175, 30),
        (250, 26),
        (300, 24),
        (500, 18),
        (550, 16),
        (800, 12),
    ];

    /// RVR bands (meters, inclusive upper bound → points)
    pub const RVR: [(u32, u8); 4] = [(75, 28), (200, 22), (300, 18), (500, 12)];

    /// Ceiling bands (feet, exclusive upper bound → points)
    pub const CEILING: [(u32, u8); 2] = [(500, 22), (800, 12)];

    /// Gust bonuses (knots, inclusive lower bound → points)
    pub const GUST: [(u32, u8); 3] = [(40, 10), (30, 6), (25, 4)];

    // === Hazard bonuses (additive) ===
    /// Thunderstorm bonus
    pub const TS_BONUS: u8 = 22;
    /// Cumulonimbus bonus
    pub const CB_BONUS: u8 = 12;
    /// Freezing fog bonus
    pub const FZFG_BONUS: u8 = 18;
    /// Fog bonus
    pub const FG_BONUS: u8 = 14;
    /// Snow bonus
    pub const SN_BONUS: u8 = 10;
    /// Rain/drizzle bonus (one bonus for the category)
    pub const RAIN_BONUS: u8 = 8;
    /// Mist bonus
    pub const BR_BONUS: u8 = 6;

    /// Score cap
    pub const MAX_SCORE: u8 = 100;

    /// Visibility at or below which freezing fog on the METAR forces a
    /// score of 100 (engine ice ops condition), overriding the additive sum
    pub const ENGINE_ICE_VIS_M: u32 = 150;
}

/// Alert classification boundaries and pillar escalation thresholds
pub mod alert_boundaries {
    /// Combined score at or above which the base alert is CRIT
    pub const CRIT_SCORE: u8 = 70;
    /// Combined score at or above which the base alert is HIGH
    pub const HIGH_SCORE: u8 = 45;
    /// Combined score at or above which the base alert is MED
    pub const MED_SCORE: u8 = 20;

    /// TAF scores are discounted because they are forecast, not observed
    pub const TAF_DISCOUNT: f64 = 0.85;

    // === Wind pillar (max gust across METAR and TAF, knots) ===
    pub const WIND_CRIT_GUST_KT: u32 = 40;
    pub const WIND_HIGH_GUST_KT: u32 = 30;
    pub const WIND_MED_GUST_KT: u32 = 25;

    // === Snow pillar (worst-case fields across both reports) ===
    /// Snow + visibility at or below this (m) escalates to CRIT
    pub const SNOW_CRIT_VIS_M: u32 = 500;
    /// Snow + RVR at or below this (m) escalates to CRIT
    pub const SNOW_CRIT_RVR_M: u32 = 300;
    /// Snow + ceiling below this (ft) escalates to CRIT
    pub const SNOW_CRIT_CEILING_FT: u32 = 500;
    /// Snow + visibility at or below this (m) escalates to HIGH
    pub const SNOW_HIGH_VIS_M: u32 = 800;
    /// Snow + RVR at or below this (m) escalates to HIGH
    pub const SNOW_HIGH_RVR_M: u32 = 500;
    /// Snow + ceiling below this (ft) escalates to HIGH
    pub const SNOW_HIGH_CEILING_FT: u32 = 1000;
}

/// OM-A/OM-B policy limits. All comparisons are strict `<` unless noted.
pub mod om_limits {
    /// Reference visibility below this triggers low-visibility takeoff
    pub const LVTO_VIS_M: u32 = 550;
    /// Reference visibility below this triggers low-visibility procedures
    pub const LVP_VIS_M: u32 = 400;
    /// RVR below this requires LVTO crew qualification (RVR-specific)
    pub const LVTO_CREW_QUAL_RVR_M: u32 = 150;
    /// RVR below this is below the absolute takeoff minimum (RVR-specific)
    pub const RVR_ABSOLUTE_MIN_M: u32 = 125;

    /// Visibility below this with no RVR group anywhere flags a
    /// reporting gap (not a restriction)
    pub const RVR_REPORTING_VIS_M: u32 = 800;

    // === Approach category bands (RVR, meters) ===
    /// RVR below this requires at least CAT II
    pub const CAT2_RVR_M: u32 = 450;
    /// RVR below this requires CAT III
    pub const CAT3_RVR_M: u32 = 200;
    /// RVR below this is below even CAT III minima
    pub const CAT3_MIN_RVR_M: u32 = 75;

    /// Temperature at or below this (°C) requires cold-temperature
    /// altitude corrections
    pub const COLD_CORRECTION_MAX_C: i32 = 0;

    /// Runway condition codes below this make operations unlikely
    pub const NO_OPS_RWYCC: u8 = 3;

    /// Runway ends narrower than this (meters) use the narrow limit column
    pub const NARROW_RUNWAY_WIDTH_M: f64 = 45.0;
}

/// Crosswind limit table keyed by (runway condition code, narrow runway).
pub mod crosswind_limits {
    /// Limit in knots for a given RWYCC estimate and runway width class.
    /// No entry exists below RWYCC 2.
    pub fn limit_kt(rwycc: u8, narrow: bool) -> Option<u32> {
        let (standard, narrow_limit) = match rwycc {
            6 => (38, 20),
            5 => (35, 20),
            4 => (20, 10),
            3 => (15, 10),
            2 => (10, 5),
            _ => return None,
        };
        Some(if narrow { narrow_limit } else { standard })
    }
}
