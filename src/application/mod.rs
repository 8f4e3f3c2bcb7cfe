//! Application layer: Use cases.
//!
//! Orchestrates domain rules with the model ports to produce risk decisions.

mod evaluator;

pub use evaluator::{Evaluation, RiskEvaluator};
