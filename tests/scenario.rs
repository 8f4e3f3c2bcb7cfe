//! End-to-end predictions through the shipped model directory.

use std::path::Path;
use std::sync::Arc;

use cardiorisk::adapters::{LogisticClassifier, ModelArtifacts, StandardScaler};
use cardiorisk::domain::{ClinicalFeatures, FeatureOrder, FeatureRecord, RiskLabel, Sex};
use cardiorisk::{CardioriskError, RiskEvaluator};

fn evaluator() -> RiskEvaluator<StandardScaler, LogisticClassifier> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
    let artifacts = ModelArtifacts::load(&dir, false).expect("load shipped models");
    RiskEvaluator::from_artifacts(artifacts)
}

fn typical_angina_case() -> ClinicalFeatures {
    ClinicalFeatures {
        age: 67.0,
        sex: Sex::Male,
        cp: 0.0,
        trestbps: 160.0,
        chol: 286.0,
        fbs: 0.0,
        restecg: 0.0,
        thalach: 108.0,
        exang: 1.0,
        oldpeak: 1.5,
        slope: 1.0,
        ca: 3.0,
        thal: 2.0,
    }
}

#[test]
fn form_defaults_are_at_risk() {
    let evaluation = evaluator()
        .evaluate(&ClinicalFeatures::default().to_record())
        .expect("evaluate");

    let decision = &evaluation.decision;
    assert_eq!(decision.label, RiskLabel::AtRisk);
    assert_eq!(
        decision.message(),
        "At Risk of Heart Disease\nConfidence: 88.31%"
    );
}

#[test]
fn reference_male_patient_below_threshold() {
    let features = ClinicalFeatures {
        sex: Sex::Male,
        ..ClinicalFeatures::default()
    };
    let evaluation = evaluator().evaluate(&features.to_record()).expect("evaluate");

    let expected = [
        -0.4815264144700562,
        0.6802575107296136,
        -0.9379243452958294,
        -0.6638871437546402,
        -0.8940767223886368,
        -0.41853932584269665,
        -1.0057142857142858,
        0.015436417701592122,
        -0.6957446808510639,
        -0.03451251078515965,
        -2.271103896103896,
        -0.7140058765915769,
        -2.1470588235294117,
    ];
    assert_eq!(evaluation.scaled.len(), expected.len());
    for (i, (got, want)) in evaluation.scaled.iter().zip(expected).enumerate() {
        assert!((got - want).abs() < 1e-12, "feature {i}: {got} vs {want}");
    }

    // Between 0.5 and 0.65 the label is "very low risk" and the confidence
    // shown is P(no-disease), below 50%.
    let decision = &evaluation.decision;
    assert!((decision.probabilities.disease - 0.6027338992332303).abs() < 1e-12);
    assert_eq!(decision.label, RiskLabel::VeryLowRisk);
    assert_eq!(
        decision.message(),
        "Very Low Risk of Heart Disease\nConfidence: 39.73%"
    );
}

#[test]
fn older_male_with_exercise_angina_scores_very_low_risk() {
    let evaluation = evaluator()
        .evaluate(&typical_angina_case().to_record())
        .expect("evaluate");

    let decision = &evaluation.decision;
    assert_eq!(decision.label, RiskLabel::VeryLowRisk);
    assert!(decision.probabilities.disease < 0.01);
    assert_eq!(decision.confidence_text(), "Confidence: 99.56%");
}

#[test]
fn non_anginal_young_patient_is_at_risk() {
    let features = ClinicalFeatures {
        age: 45.0,
        cp: 3.0,
        trestbps: 110.0,
        chol: 180.0,
        restecg: 1.0,
        thalach: 185.0,
        oldpeak: 0.0,
        slope: 2.0,
        thal: 2.0,
        ..ClinicalFeatures::default()
    };

    let decision = evaluator()
        .evaluate(&features.to_record())
        .expect("evaluate")
        .decision;
    assert!(decision.is_at_risk());
    assert_eq!(decision.confidence_text(), "Confidence: 99.85%");
}

#[test]
fn column_order_of_the_record_does_not_matter() {
    let evaluator = evaluator();
    let canonical = typical_angina_case().to_record();

    let mut reversed: Vec<(&str, f64)> = canonical
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    reversed.reverse();
    let shuffled = FeatureRecord::from_named(reversed).expect("record");

    let a = evaluator.evaluate(&canonical).expect("evaluate");
    let b = evaluator.evaluate(&shuffled).expect("evaluate");
    assert_eq!(a.scaled, b.scaled);
    assert_eq!(
        a.decision.probabilities.disease.to_bits(),
        b.decision.probabilities.disease.to_bits()
    );
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let evaluator = evaluator();
    let record = ClinicalFeatures::default().to_record();
    let first = evaluator.evaluate(&record).expect("evaluate");

    for _ in 0..10 {
        let again = evaluator.evaluate(&record).expect("evaluate");
        assert_eq!(
            first.decision.probabilities.disease.to_bits(),
            again.decision.probabilities.disease.to_bits()
        );
        assert_eq!(first.decision.label, again.decision.label);
    }
}

#[test]
fn incomplete_record_is_a_schema_error() {
    let record = FeatureRecord::from_named([("age", 50.0), ("sex", 1.0)]).expect("record");
    assert!(matches!(
        evaluator().evaluate(&record),
        Err(CardioriskError::Schema(_))
    ));
}

#[test]
fn scaled_vector_follows_canonical_order() {
    let evaluator = evaluator();
    let evaluation = evaluator
        .evaluate(&ClinicalFeatures::default().to_record())
        .expect("evaluate");

    assert_eq!(evaluator.feature_order(), &FeatureOrder::dataset_default());
    assert_eq!(evaluation.scaled.len(), 13);
    // age 50 against mean 54.366 and scale 9.067
    assert!((evaluation.scaled[0] - (50.0 - 54.366) / 9.067).abs() < 1e-12);
}

#[test]
fn shared_evaluator_across_threads() {
    let evaluator = Arc::new(evaluator());
    let record = typical_angina_case().to_record();
    let expected = evaluator.evaluate(&record).expect("evaluate");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let evaluator = Arc::clone(&evaluator);
            let record = record.clone();
            std::thread::spawn(move || evaluator.evaluate(&record).expect("evaluate"))
        })
        .collect();

    for handle in handles {
        let got = handle.join().expect("thread");
        assert_eq!(got.scaled, expected.scaled);
    }
}
