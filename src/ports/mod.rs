//! Ports layer: Trait definitions for external capabilities.
//!
//! Following Hexagonal Architecture, these traits separate the evaluator from
//! the concrete model artifacts.

mod model;

pub use model::{Classifier, ModelError, Scaler};
