//! Risk decision types.
//!
//! Represents the thresholded output of one heart disease prediction.

use serde::{Deserialize, Serialize};

/// `P(disease)` must exceed this value for an "at risk" label.
pub const DECISION_THRESHOLD: f64 = 0.65;

/// Classifier output over {no-disease, disease}.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub no_disease: f64,
    pub disease: f64,
}

impl ClassProbabilities {
    /// Binary distribution from the positive-class probability.
    #[must_use]
    pub fn from_disease(disease: f64) -> Self {
        Self {
            no_disease: 1.0 - disease,
            disease,
        }
    }

    /// Whether both entries are finite, in `[0, 1]`, and sum to one.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let in_unit = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        in_unit(self.no_disease)
            && in_unit(self.disease)
            && (self.no_disease + self.disease - 1.0).abs() < 1e-9
    }
}

/// Binary risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// `P(disease)` above the decision threshold
    AtRisk,
    /// Everything else, including exactly the threshold
    VeryLowRisk,
}

impl RiskLabel {
    /// Headline shown to the user.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::AtRisk => "At Risk of Heart Disease",
            Self::VeryLowRisk => "Very Low Risk of Heart Disease",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::AtRisk => (244, 63, 94),       // Rose (#F43F5E)
            Self::VeryLowRisk => (16, 185, 129), // Emerald (#10B981)
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtRisk => write!(f, "AT RISK"),
            Self::VeryLowRisk => write!(f, "VERY LOW RISK"),
        }
    }
}

/// Outcome of one prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDecision {
    pub probabilities: ClassProbabilities,
    pub label: RiskLabel,
    pub threshold: f64,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
}

impl RiskDecision {
    /// Apply `threshold` to the disease probability. Strictly greater is at risk.
    #[must_use]
    pub fn new(probabilities: ClassProbabilities, threshold: f64) -> Self {
        let label = if probabilities.disease > threshold {
            RiskLabel::AtRisk
        } else {
            RiskLabel::VeryLowRisk
        };

        Self {
            probabilities,
            label,
            threshold,
            evaluated_at: chrono::Utc::now(),
        }
    }

    /// Decision with the default threshold.
    #[must_use]
    pub fn from_probabilities(probabilities: ClassProbabilities) -> Self {
        Self::new(probabilities, DECISION_THRESHOLD)
    }

    #[must_use]
    pub fn is_at_risk(&self) -> bool {
        self.label == RiskLabel::AtRisk
    }

    /// Probability backing the label: `P(disease)` when at risk, else
    /// `1 - P(disease)`.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.label {
            RiskLabel::AtRisk => self.probabilities.disease,
            RiskLabel::VeryLowRisk => 1.0 - self.probabilities.disease,
        }
    }

    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        self.confidence() * 100.0
    }

    /// `Confidence: NN.NN%`
    #[must_use]
    pub fn confidence_text(&self) -> String {
        format!("Confidence: {:.2}%", self.confidence_percent())
    }

    /// Evaluation time, second precision, as shown in the result header.
    #[must_use]
    pub fn evaluated_at_text(&self) -> String {
        self.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// Full two-line status message.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{}\n{}", self.label.headline(), self.confidence_text())
    }
}
