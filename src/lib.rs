//! # Cardiorisk
//!
//! Terminal cardiovascular disease risk predictor.
//!
//! Thirteen clinical measurements are collected in a form, reordered into the
//! canonical feature order, standardized with a fitted scaler, and scored by a
//! fitted logistic regression. `P(disease)` above 0.65 is reported as "at risk".
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Feature schema, input domains, risk decision
//! - `ports`: `Scaler` and `Classifier` traits
//! - `adapters`: JSON model artifacts, log sanitization
//! - `application`: the risk evaluator
//! - `config`: environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{Evaluation, RiskEvaluator};
pub use domain::{ClinicalFeatures, FeatureRecord, RiskDecision, RiskLabel};

/// Result type for Cardiorisk operations
pub type Result<T> = std::result::Result<T, CardioriskError>;

/// Main error type for Cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum CardioriskError {
    #[error("Failed to load model artifacts: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Feature schema error: {0}")]
    Schema(#[from] domain::SchemaError),

    #[error("Model evaluation failed: {0}")]
    Model(#[from] ports::ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureName, FeatureOrder, SchemaError};
    use crate::ports::ModelError;

    fn reindex_empty() -> Result<Vec<f64>> {
        Ok(FeatureRecord::default().reindex(&FeatureOrder::dataset_default())?)
    }

    #[test]
    fn test_errors_convert_into_crate_error() {
        assert!(matches!(
            reindex_empty(),
            Err(CardioriskError::Schema(SchemaError::MissingField(FeatureName::Age)))
        ));

        let err = CardioriskError::from(ModelError::NonFinite(3));
        assert!(matches!(err, CardioriskError::Model(ModelError::NonFinite(3))));
        assert!(err.to_string().starts_with("Model evaluation failed"));

        let err = CardioriskError::from(adapters::ArtifactError::Invalid("bad".into()));
        assert_eq!(err.to_string(), "Failed to load model artifacts: Invalid artifact: bad");
    }
}
