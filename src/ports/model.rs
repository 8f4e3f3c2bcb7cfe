//! Model port: Traits for the fitted preprocessing and classification steps.
//!
//! Both traits operate on vectors already in canonical feature order. They
//! know nothing about feature names.

use crate::domain::ClassProbabilities;

/// Errors raised while applying a fitted model to an input vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Input has {actual} features, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Non-finite value at position {0}")]
    NonFinite(usize),

    #[error("Invalid probability output: {0:?}")]
    InvalidProbabilities(ClassProbabilities),
}

/// Fitted normalization transform.
pub trait Scaler: Send + Sync {
    /// Number of features the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Normalize a canonical-order vector. Output has the same length and order.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` on a wrong-length input.
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Fitted binary probability model over {no-disease, disease}.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// Class probabilities for one normalized vector.
    ///
    /// # Errors
    /// Returns error on a wrong-length input or an invalid distribution.
    fn predict_proba(&self, input: &[f64]) -> Result<ClassProbabilities, ModelError>;
}
