//! Risk evaluator: turns a feature record into a thresholded decision.
//!
//! Pipeline:
//! 1. Reindex the record into canonical feature order
//! 2. Scale with the fitted scaler
//! 3. Classify with the fitted classifier
//! 4. Threshold `P(disease)`

use std::sync::Arc;

use crate::adapters::{LogisticClassifier, ModelArtifacts, StandardScaler};
use crate::domain::{FeatureOrder, FeatureRecord, RiskDecision, DECISION_THRESHOLD};
use crate::ports::{Classifier, ModelError, Scaler};
use crate::CardioriskError;

/// Result of one evaluation: what the classifier saw and what it decided.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Normalized vector in canonical order, shown for transparency
    pub scaled: Vec<f64>,
    pub decision: RiskDecision,
}

/// Stateless evaluator over immutable, shared model artifacts.
///
/// Cloning is cheap; every clone reads the same artifacts.
pub struct RiskEvaluator<S, C>
where
    S: Scaler,
    C: Classifier,
{
    order: Arc<FeatureOrder>,
    scaler: Arc<S>,
    classifier: Arc<C>,
    threshold: f64,
}

impl<S, C> Clone for RiskEvaluator<S, C>
where
    S: Scaler,
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            order: Arc::clone(&self.order),
            scaler: Arc::clone(&self.scaler),
            classifier: Arc::clone(&self.classifier),
            threshold: self.threshold,
        }
    }
}

impl RiskEvaluator<StandardScaler, LogisticClassifier> {
    /// Build an evaluator from loaded artifacts with the default threshold.
    #[must_use]
    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self::new(
            Arc::new(artifacts.order),
            Arc::new(artifacts.scaler),
            Arc::new(artifacts.classifier),
        )
    }
}

impl<S, C> RiskEvaluator<S, C>
where
    S: Scaler,
    C: Classifier,
{
    /// Create an evaluator using [`DECISION_THRESHOLD`].
    pub fn new(order: Arc<FeatureOrder>, scaler: Arc<S>, classifier: Arc<C>) -> Self {
        Self {
            order,
            scaler,
            classifier,
            threshold: DECISION_THRESHOLD,
        }
    }

    /// Replace the decision threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn feature_order(&self) -> &FeatureOrder {
        &self.order
    }

    /// Run the full pipeline on one record.
    ///
    /// # Errors
    /// Returns `CardioriskError::Schema` if the record lacks a canonical
    /// feature, or `CardioriskError::Model` if the scaler or classifier
    /// rejects its input.
    pub fn evaluate(&self, record: &FeatureRecord) -> Result<Evaluation, CardioriskError> {
        tracing::debug!("Step 1: Reindexing {} features...", record.len());
        let ordered = record.reindex(&self.order)?;

        tracing::debug!("Step 2: Scaling...");
        let scaled = self.scaler.transform(&ordered)?;
        if scaled.len() != ordered.len() {
            return Err(CardioriskError::Model(ModelError::DimensionMismatch {
                expected: ordered.len(),
                actual: scaled.len(),
            }));
        }

        tracing::debug!("Step 3: Classifying...");
        let probabilities = self.classifier.predict_proba(&scaled)?;

        let decision = RiskDecision::new(probabilities, self.threshold);

        tracing::info!(
            evaluated_at = %decision.evaluated_at,
            "Evaluation complete: label={}, p_disease={:.4}, threshold={}",
            decision.label,
            decision.probabilities.disease,
            self.threshold
        );

        Ok(Evaluation { scaled, decision })
    }
}
