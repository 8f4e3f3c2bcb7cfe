//! Artifact adapter: fitted scaler, classifier, and feature order from JSON.
//!
//! A model directory contains:
//! - `feature_order.json`: the 13 column names the model was fitted on
//! - `scaler.json`: per-feature `mean` and `scale` of a standardization
//! - `cardio_model.json`: logistic regression `coefficients` and `intercept`
//! - `manifest.json` (optional): SHA-256 digests binding the files above
//!
//! Everything is loaded once at startup. Any failure here is fatal to the
//! application; there is no partial or lazy loading.
//!
//! Regenerate the manifest after replacing artifacts:
//! `cargo run --bin write_manifest -- <model_dir>`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{ClassProbabilities, FeatureOrder, SchemaError, FEATURE_COUNT};
use crate::ports::{Classifier, ModelError, Scaler};

pub const FEATURE_ORDER_FILE: &str = "feature_order.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "cardio_model.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Files a manifest must bind.
pub const ARTIFACT_FILES: [&str; 3] = [FEATURE_ORDER_FILE, SCALER_FILE, MODEL_FILE];

const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("File hash mismatch for {0}")]
    HashMismatch(String),

    #[error("manifest.json required but not found in {0:?}")]
    ManifestRequired(PathBuf),

    #[error("Invalid feature order: {0}")]
    Schema(#[from] SchemaError),
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn check_finite(name: &str, values: &[f64]) -> Result<(), ArtifactError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ArtifactError::Invalid(format!(
            "{name}[{i}] is not a finite number"
        ))),
        None => Ok(()),
    }
}

/// Fitted standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,

    /// Column names at fit time, when the exporter recorded them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// # Errors
    /// Returns error if the statistics are inconsistent or a scale is not positive.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let scaler = Self {
            mean,
            scale,
            feature_names: None,
        };
        scaler.check()?;
        Ok(scaler)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler mean has {} entries, scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        check_finite("mean", &self.mean)?;
        check_finite("scale", &self.scale)?;
        if let Some(i) = self.scale.iter().position(|s| *s <= 0.0) {
            return Err(ArtifactError::Invalid(format!(
                "scale[{i}] must be positive"
            )));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        if input.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                actual: input.len(),
            });
        }
        if let Some(i) = input.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite(i));
        }

        Ok(input
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

/// Fitted logistic regression: `P(disease) = sigmoid(w . x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl LogisticClassifier {
    /// # Errors
    /// Returns error if any parameter is not finite.
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        let model = Self {
            coefficients,
            intercept,
            model_name: None,
        };
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        check_finite("coefficients", &self.coefficients)?;
        if !self.intercept.is_finite() {
            return Err(ArtifactError::Invalid("intercept is not finite".into()));
        }
        Ok(())
    }

    /// Linear score before the sigmoid.
    fn decision_function(&self, input: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(input)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Logistic function without overflow for large `|z|`.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, input: &[f64]) -> Result<ClassProbabilities, ModelError> {
        if input.len() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: input.len(),
            });
        }
        if let Some(i) = input.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite(i));
        }

        let probabilities = ClassProbabilities::from_disease(sigmoid(self.decision_function(input)));
        if !probabilities.is_valid() {
            return Err(ModelError::InvalidProbabilities(probabilities));
        }
        Ok(probabilities)
    }
}

/// SHA-256 digests of the artifact files, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash the artifact files currently in `dir`.
    ///
    /// # Errors
    /// Returns error if an artifact file cannot be read.
    pub fn for_directory(dir: &Path) -> Result<Self, ArtifactError> {
        let mut files = BTreeMap::new();
        for name in ARTIFACT_FILES {
            let bytes = read_bytes(&dir.join(name))?;
            files.insert(name.to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    /// Write `manifest.json` into `dir`, returning its path.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let path = dir.join(MANIFEST_FILE);
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|source| ArtifactError::Parse {
            path: path.clone(),
            source,
        })?;
        bytes.push(b'\n');
        fs::write(&path, bytes).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Check every bound file against its recorded digest.
    ///
    /// # Errors
    /// Returns `ArtifactError::HashMismatch` on the first differing file.
    pub fn verify(&self, dir: &Path) -> Result<(), ArtifactError> {
        if self.version != MANIFEST_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "Unsupported manifest version: {}",
                self.version
            )));
        }

        for name in ARTIFACT_FILES {
            if !self.files.contains_key(name) {
                return Err(ArtifactError::Invalid(format!(
                    "{MANIFEST_FILE} does not bind {name}"
                )));
            }
        }

        for (rel, expected_hex) in &self.files {
            let bytes = read_bytes(&dir.join(rel))?;
            if !sha256_hex(&bytes).eq_ignore_ascii_case(expected_hex.trim()) {
                return Err(ArtifactError::HashMismatch(rel.clone()));
            }
        }

        Ok(())
    }
}

/// Everything a prediction needs, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub order: FeatureOrder,
    pub scaler: StandardScaler,
    pub classifier: LogisticClassifier,
}

impl ModelArtifacts {
    /// Assemble artifacts and check they agree with each other.
    ///
    /// # Errors
    /// Returns error if dimensions differ or the scaler's recorded column
    /// names disagree with `order`.
    pub fn from_parts(
        order: FeatureOrder,
        scaler: StandardScaler,
        classifier: LogisticClassifier,
    ) -> Result<Self, ArtifactError> {
        scaler.check()?;
        classifier.check()?;

        if scaler.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "scaler fitted on {} features, expected {FEATURE_COUNT}",
                scaler.n_features()
            )));
        }
        if classifier.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::Invalid(format!(
                "classifier fitted on {} features, expected {FEATURE_COUNT}",
                classifier.n_features()
            )));
        }

        if let Some(names) = &scaler.feature_names {
            let fitted = FeatureOrder::from_names(names)?;
            if fitted != order {
                return Err(ArtifactError::Invalid(format!(
                    "scaler was fitted on column order {:?}, {FEATURE_ORDER_FILE} says {:?}",
                    Vec::<String>::from(fitted),
                    Vec::<String>::from(order),
                )));
            }
        }

        Ok(Self {
            order,
            scaler,
            classifier,
        })
    }

    /// Load all artifacts from `dir`.
    ///
    /// When `manifest.json` is present every bound file is hash-checked before
    /// parsing. `require_manifest` turns a missing manifest into an error.
    ///
    /// # Errors
    /// Returns error if any file is missing, unreadable, malformed, or fails
    /// its hash check.
    pub fn load(dir: &Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            let manifest: ArtifactManifest = read_json(&manifest_path)?;
            manifest.verify(dir)?;
            tracing::info!("Artifact hashes verified against {:?}", manifest_path);
        } else if require_manifest {
            tracing::error!("No {} in {:?}", MANIFEST_FILE, dir);
            return Err(ArtifactError::ManifestRequired(dir.to_path_buf()));
        } else {
            tracing::warn!(
                "No {} in {:?}; loading artifacts without integrity check",
                MANIFEST_FILE,
                dir
            );
        }

        let order: FeatureOrder = read_json(&dir.join(FEATURE_ORDER_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        let classifier: LogisticClassifier = read_json(&dir.join(MODEL_FILE))?;

        let artifacts = Self::from_parts(order, scaler, classifier)?;

        tracing::info!(
            "Loaded model {:?} from {:?} (n_features={})",
            artifacts
                .classifier
                .model_name
                .as_deref()
                .unwrap_or("unnamed"),
            dir,
            artifacts.order.len()
        );

        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_scaler() -> StandardScaler {
        StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT])
            .expect("Should build")
    }

    #[test]
    fn test_scaler_transform() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.5]).expect("Should build");
        let out = scaler.transform(&[14.0, 1.0]).expect("Should transform");
        assert_eq!(out, vec![2.0, 2.0]);

        assert_eq!(
            scaler.transform(&[1.0]),
            Err(ModelError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            scaler.transform(&[1.0, f64::NAN]),
            Err(ModelError::NonFinite(1))
        );
    }

    #[test]
    fn test_scaler_rejects_bad_statistics() {
        assert!(StandardScaler::new(vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![0.0], vec![0.0]).is_err());
        assert!(StandardScaler::new(vec![f64::INFINITY], vec![1.0]).is_err());
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_probabilities() {
        let model = LogisticClassifier::new(vec![1.0, -1.0], 0.0).expect("Should build");
        let p = model.predict_proba(&[0.5, 0.5]).expect("Should predict");
        assert!((p.disease - 0.5).abs() < 1e-12);
        assert!((p.no_disease + p.disease - 1.0).abs() < 1e-12);

        let p = model.predict_proba(&[3.0, 0.0]).expect("Should predict");
        assert!(p.disease > 0.95);
        assert!(model.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_from_parts_checks_dimensions() {
        let order = FeatureOrder::dataset_default();
        let short = LogisticClassifier::new(vec![0.0; 12], 0.0).expect("Should build");
        assert!(matches!(
            ModelArtifacts::from_parts(order, identity_scaler(), short),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_parts_checks_scaler_column_order() {
        let order = FeatureOrder::dataset_default();
        let mut names: Vec<String> = order.clone().into();
        names.swap(0, 1);

        let mut scaler = identity_scaler();
        scaler.feature_names = Some(names);
        let model = LogisticClassifier::new(vec![0.0; FEATURE_COUNT], 0.0).expect("Should build");

        assert!(matches!(
            ModelArtifacts::from_parts(order, scaler, model),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
