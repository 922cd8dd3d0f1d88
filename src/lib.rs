//! metops: METAR/TAF Operational Intelligence
//!
//! Decodes coded aviation weather reports into structured, auditable
//! operational signals.
//!
//! ## Architecture
//!
//! - **Decoder**: tokenizer + total-function field extractors
//!   (visibility, RVR, ceiling, wind, temperature, hazards)
//! - **Assessment**: additive severity scorer and the pillar-escalated
//!   alert classifier
//! - **Policy**: OM-A/OM-B advisory evaluator with crosswind geometry
//!   and a per-flag evidence trail
//! - **Pipeline**: per-station evaluation and rayon batch fan-out
//!
//! Everything is a pure, synchronous function over immutable inputs: no
//! I/O, no persistence, no shared mutable state. Callers supply the
//! runway-geometry and approach-minima tables explicitly.

pub mod assessment;
pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod types;

// Re-export the decoding entry points
pub use decoder::{decode, DecodedReport};

// Re-export commonly used types
pub use types::{
    AdvisoryFlag, AlertLevel, ApproachBand, ApproachMinima, EvidenceEntry, EvidenceTrail,
    LvoBand, MinimaBand, MinimaPair, MinimaTable, ObsTime, ParsedObservation, Phenomenon,
    PolicyAdvisory, RawReport, ReportKind, RunwayCondition, RunwayEnd, RunwayTable,
    SeverityAssessment, StationAssessment, Wind,
};

// Re-export assessment and policy evaluation
pub use assessment::{assess_station, score_report};
pub use policy::{evaluate_crosswind, evaluate_policy};

// Re-export the pipeline
pub use error::EngineError;
pub use pipeline::{evaluate_batch, evaluate_station, StationReports};
