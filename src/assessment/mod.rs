//! Severity scoring and alert classification

pub mod alert;
pub mod severity;

pub use alert::assess_station;
pub use severity::{engine_ice_ops, score_report};
