//! Crosswind geometry against supplied runway ends
//!
//! For every runway end the crosswind component is the effective wind
//! speed (gust when reported) projected across the runway axis. The
//! best-aligned end — minimum crosswind, hence the operationally
//! preferred runway — is selected, and its width class picks the limit
//! column from the (RWYCC, narrow) table.

use crate::types::crosswind_limits;
use crate::types::{RunwayEnd, Wind};

/// Crosswind result for the selected (best-aligned) runway end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswindAssessment {
    /// Crosswind component in knots, rounded
    pub crosswind_kt: u32,
    /// Applicable OM limit in knots
    pub limit_kt: u32,
    /// Crosswind exceeds the limit
    pub exceed: bool,
    /// Designator of the selected end, when the table names it
    pub runway: Option<String>,
}

/// Absolute angular difference between wind and runway heading,
/// wrapped to 0..=180 degrees
pub fn wrapped_angle_deg(wind_dir_deg: u16, heading_deg: u16) -> u16 {
    let diff = (i32::from(wind_dir_deg) - i32::from(heading_deg)).rem_euclid(360);
    let diff = diff.unsigned_abs() as u16;
    if diff > 180 {
        360 - diff
    } else {
        diff
    }
}

/// Crosswind component in knots: speed × sin(angle), rounded
pub fn crosswind_component_kt(speed_kt: u32, angle_deg: u16) -> u32 {
    let radians = f64::from(angle_deg).to_radians();
    (f64::from(speed_kt) * radians.sin()).round() as u32
}

/// Evaluate the crosswind for a station's wind against its runway ends.
///
/// Returns `None` — all crosswind fields absent — when the wind direction
/// is variable or missing, when no runway geometry is supplied, or when
/// the RWYCC estimate has no limit table entry.
pub fn evaluate_crosswind(
    wind: &Wind,
    ends: &[RunwayEnd],
    rwycc: u8,
) -> Option<CrosswindAssessment> {
    let wind_dir = wind.dir_deg?;
    let speed = wind.effective_speed_kt();

    let best = ends.iter().min_by_key(|end| {
        crosswind_component_kt(speed, wrapped_angle_deg(wind_dir, end.heading_deg))
    })?;

    let crosswind_kt =
        crosswind_component_kt(speed, wrapped_angle_deg(wind_dir, best.heading_deg));
    let limit_kt = crosswind_limits::limit_kt(rwycc, best.is_narrow())?;

    Some(CrosswindAssessment {
        crosswind_kt,
        limit_kt,
        exceed: crosswind_kt > limit_kt,
        runway: best.name.clone(),
    })
}
