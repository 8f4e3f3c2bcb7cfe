//! Loading model artifacts from disk.

use std::fs;
use std::path::{Path, PathBuf};

use cardiorisk::adapters::artifacts::{
    ArtifactManifest, FEATURE_ORDER_FILE, MANIFEST_FILE, MODEL_FILE, SCALER_FILE,
};
use cardiorisk::adapters::{ArtifactError, ModelArtifacts};
use cardiorisk::domain::FeatureName;

fn shipped_models() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("models")
}

/// Copy the shipped artifacts into a scratch directory.
fn scratch_models() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tmp dir");
    for name in [FEATURE_ORDER_FILE, SCALER_FILE, MODEL_FILE] {
        fs::copy(shipped_models().join(name), dir.path().join(name)).expect("copy artifact");
    }
    dir
}

#[test]
fn shipped_artifacts_load() {
    let artifacts = ModelArtifacts::load(&shipped_models(), false).expect("load ok");
    assert_eq!(artifacts.order.len(), 13);
    assert_eq!(artifacts.order.names()[0], FeatureName::Age);
    assert_eq!(artifacts.order.names()[12], FeatureName::Thal);
}

#[test]
fn missing_artifact_is_fatal() {
    for name in [FEATURE_ORDER_FILE, SCALER_FILE, MODEL_FILE] {
        let dir = scratch_models();
        fs::remove_file(dir.path().join(name)).expect("remove");

        match ModelArtifacts::load(dir.path(), false) {
            Err(ArtifactError::Io { path, .. }) => assert!(path.ends_with(name)),
            other => panic!("expected Io error for missing {name}, got {other:?}"),
        }
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = scratch_models();
    fs::write(dir.path().join(MODEL_FILE), "{ \"coefficients\": [1.0,").expect("write");

    assert!(matches!(
        ModelArtifacts::load(dir.path(), false),
        Err(ArtifactError::Parse { .. })
    ));
}

#[test]
fn wrong_dimension_is_rejected() {
    let dir = scratch_models();
    fs::write(
        dir.path().join(MODEL_FILE),
        r#"{ "coefficients": [0.1, 0.2, 0.3], "intercept": 0.0 }"#,
    )
    .expect("write");

    assert!(matches!(
        ModelArtifacts::load(dir.path(), false),
        Err(ArtifactError::Invalid(_))
    ));
}

#[test]
fn feature_order_with_unknown_name_is_rejected() {
    let dir = scratch_models();
    let mut names: Vec<String> =
        serde_json::from_str(&fs::read_to_string(dir.path().join(FEATURE_ORDER_FILE)).expect("read"))
            .expect("json");
    names[3] = "blood_pressure".to_string();
    fs::write(
        dir.path().join(FEATURE_ORDER_FILE),
        serde_json::to_string(&names).expect("json"),
    )
    .expect("write");

    assert!(ModelArtifacts::load(dir.path(), false).is_err());
}

#[test]
fn scaler_column_order_must_match_feature_order() {
    let dir = scratch_models();
    let mut names: Vec<String> =
        serde_json::from_str(&fs::read_to_string(dir.path().join(FEATURE_ORDER_FILE)).expect("read"))
            .expect("json");
    names.swap(0, 1);
    fs::write(
        dir.path().join(FEATURE_ORDER_FILE),
        serde_json::to_string(&names).expect("json"),
    )
    .expect("write");

    assert!(matches!(
        ModelArtifacts::load(dir.path(), false),
        Err(ArtifactError::Invalid(_))
    ));
}

#[test]
fn manifest_round_trip_and_tamper_detection() {
    let dir = scratch_models();
    let manifest = ArtifactManifest::for_directory(dir.path()).expect("hash");
    let path = manifest.write_to(dir.path()).expect("write manifest");
    assert!(path.ends_with(MANIFEST_FILE));

    ModelArtifacts::load(dir.path(), true).expect("verified load");

    // Whitespace changes the digest without changing the parsed model.
    let model_path = dir.path().join(MODEL_FILE);
    let mut bytes = fs::read(&model_path).expect("read");
    bytes.push(b'\n');
    fs::write(&model_path, bytes).expect("write");

    match ModelArtifacts::load(dir.path(), false) {
        Err(ArtifactError::HashMismatch(name)) => assert_eq!(name, MODEL_FILE),
        other => panic!("expected hash mismatch, got {other:?}"),
    }
}

#[test]
fn required_manifest_must_exist() {
    let dir = scratch_models();
    let err = ModelArtifacts::load(dir.path(), true).expect_err("should require manifest");
    assert!(matches!(err, ArtifactError::ManifestRequired(_)));
    assert!(err.to_string().contains("manifest.json required"));

    ModelArtifacts::load(dir.path(), false).expect("optional manifest");
}
