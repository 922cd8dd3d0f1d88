//! OM policy evaluation: advisory flags, crosswind geometry, evidence trail

pub mod crosswind;
pub mod evaluator;
pub mod evidence;

pub use crosswind::{evaluate_crosswind, CrosswindAssessment};
pub use evaluator::evaluate_policy;
pub use evidence::{snippet_around, EvidenceBuilder};
