//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: JSON model artifacts (scaler, classifier, feature order)
//! - `sanitize`: clinical value filtering for logs

pub mod artifacts;
pub mod sanitize;

pub use artifacts::{ArtifactError, LogisticClassifier, ModelArtifacts, StandardScaler};
