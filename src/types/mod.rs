//! Shared data structures for the METAR/TAF operational intelligence core
//!
//! This module defines the types flowing through the evaluation pipeline:
//! - RawReport / ParsedObservation (decoder input and output)
//! - SeverityAssessment / AlertLevel (scorer and classifier outputs)
//! - PolicyAdvisory / EvidenceTrail (OM policy evaluator output)
//! - RunwayTable / MinimaTable (caller-supplied lookup tables)
//! - threshold constant modules (severity bands, alert boundaries, OM limits)

mod advisory;
mod assessment;
mod report;
mod runway;
// Public so the threshold constant sub-modules remain accessible as
// `types::thresholds::om_limits` etc.
pub mod thresholds;

pub use advisory::*;
pub use assessment::*;
pub use report::*;
pub use runway::*;
pub use thresholds::*;
