//! Clinical feature types for heart disease risk prediction.
//!
//! Based on the 13-attribute UCI heart disease schema (age, sex, cp, trestbps,
//! chol, fbs, restecg, thalach, exang, oldpeak, slope, ca, thal).
//!
//! The scaler and classifier are position-dependent, so every vector handed to
//! them is produced by [`FeatureRecord::reindex`] against a [`FeatureOrder`]
//! that was checked for totality when it was loaded.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of clinical features consumed by the model.
pub const FEATURE_COUNT: usize = 13;

/// Errors raised when a record or feature order does not match the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing feature in record: {0}")]
    MissingField(FeatureName),

    #[error("Duplicate feature: {0}")]
    DuplicateField(FeatureName),

    #[error("Unknown feature name: {0:?}")]
    UnknownField(String),

    #[error("Expected {expected} features, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// One of the 13 named model inputs.
///
/// The string form is the dataset column name used in `feature_order.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureName {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

impl FeatureName {
    /// All features, in the order the collector enumerates them.
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        Self::Age,
        Self::Sex,
        Self::Cp,
        Self::Trestbps,
        Self::Chol,
        Self::Fbs,
        Self::Restecg,
        Self::Thalach,
        Self::Exang,
        Self::Oldpeak,
        Self::Slope,
        Self::Ca,
        Self::Thal,
    ];

    /// Dataset column name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Cp => "cp",
            Self::Trestbps => "trestbps",
            Self::Chol => "chol",
            Self::Fbs => "fbs",
            Self::Restecg => "restecg",
            Self::Thalach => "thalach",
            Self::Exang => "exang",
            Self::Oldpeak => "oldpeak",
            Self::Slope => "slope",
            Self::Ca => "ca",
            Self::Thal => "thal",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == trimmed)
            .ok_or_else(|| SchemaError::UnknownField(s.to_string()))
    }
}

/// Patient sex as presented to the user. Encoded Female=0, Male=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl Sex {
    /// Numeric encoding used by the model.
    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::Female => 0.0,
            Self::Male => 1.0,
        }
    }

    /// Decode the model encoding.
    #[must_use]
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 0.0 {
            Some(Self::Female)
        } else if code == 1.0 {
            Some(Self::Male)
        } else {
            None
        }
    }
}

/// Typed clinical inputs for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalFeatures {
    /// Age in years
    pub age: f64,

    pub sex: Sex,

    /// Chest pain type (0-3)
    pub cp: f64,

    /// Resting blood pressure in mmHg
    pub trestbps: f64,

    /// Serum cholesterol in mg/dl
    pub chol: f64,

    /// Fasting blood sugar > 120 mg/dl (0/1)
    pub fbs: f64,

    /// Resting ECG result (0-2)
    pub restecg: f64,

    /// Maximum heart rate achieved
    pub thalach: f64,

    /// Exercise induced angina (0/1)
    pub exang: f64,

    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,

    /// Slope of the peak exercise ST segment (0-2)
    pub slope: f64,

    /// Number of major vessels colored by fluoroscopy (0-3)
    pub ca: f64,

    /// Thalassemia: 1 = normal, 2 = fixed defect, 3 = reversible defect
    pub thal: f64,
}

impl Default for ClinicalFeatures {
    /// The collector's initial form values.
    fn default() -> Self {
        Self {
            age: 50.0,
            sex: Sex::Female,
            cp: 0.0,
            trestbps: 120.0,
            chol: 200.0,
            fbs: 0.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 1.0,
            slope: 0.0,
            ca: 0.0,
            thal: 1.0,
        }
    }
}

impl ClinicalFeatures {
    /// Numeric value of a single feature, with sex already encoded.
    #[must_use]
    pub fn value(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::Age => self.age,
            FeatureName::Sex => self.sex.encode(),
            FeatureName::Cp => self.cp,
            FeatureName::Trestbps => self.trestbps,
            FeatureName::Chol => self.chol,
            FeatureName::Fbs => self.fbs,
            FeatureName::Restecg => self.restecg,
            FeatureName::Thalach => self.thalach,
            FeatureName::Exang => self.exang,
            FeatureName::Oldpeak => self.oldpeak,
            FeatureName::Slope => self.slope,
            FeatureName::Ca => self.ca,
            FeatureName::Thal => self.thal,
        }
    }

    /// Build features from values listed in [`FeatureName::ALL`] order.
    ///
    /// # Errors
    /// Returns error if the slice length is not 13 or the sex code is not 0/1.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!("Expected {FEATURE_COUNT} features, got {}", v.len()));
        }

        let sex = Sex::from_code(v[1]).ok_or_else(|| format!("Sex code {} must be 0 or 1", v[1]))?;

        Ok(Self {
            age: v[0],
            sex,
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
            oldpeak: v[9],
            slope: v[10],
            ca: v[11],
            thal: v[12],
        })
    }

    /// Assemble the named record in collector order.
    #[must_use]
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord {
            entries: FeatureName::ALL
                .iter()
                .map(|&name| (name, self.value(name)))
                .collect(),
        }
    }
}

/// Named feature values in arbitrary order.
///
/// Never handed to the model directly; see [`FeatureRecord::reindex`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    entries: Vec<(FeatureName, f64)>,
}

impl FeatureRecord {
    /// Build a record from `(name, value)` pairs in any order.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateField` if a name appears twice.
    pub fn from_entries<I>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (FeatureName, f64)>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (name, value) in entries {
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateField(name));
            }
            out.push((name, value));
        }
        Ok(Self { entries: out })
    }

    /// Build a record from column names, as they would appear in a data file.
    ///
    /// # Errors
    /// Returns error on unknown or duplicate names.
    pub fn from_named<'a, I>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let parsed = entries
            .into_iter()
            .map(|(name, value)| Ok((name.parse::<FeatureName>()?, value)))
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Self::from_entries(parsed)
    }

    #[must_use]
    pub fn get(&self, name: FeatureName) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FeatureName, f64)> {
        self.entries.iter()
    }

    /// Produce the model input vector in canonical order.
    ///
    /// # Errors
    /// Returns `SchemaError::MissingField` for the first canonical feature the
    /// record does not contain.
    pub fn reindex(&self, order: &FeatureOrder) -> Result<Vec<f64>, SchemaError> {
        order
            .iter()
            .map(|name| self.get(name).ok_or(SchemaError::MissingField(name)))
            .collect()
    }
}

/// The canonical feature sequence the scaler and classifier were fitted on.
///
/// Construction guarantees each of the 13 features appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureOrder {
    names: Vec<FeatureName>,
}

impl FeatureOrder {
    /// Parse and check an order read from an artifact.
    ///
    /// # Errors
    /// Returns error if the list is not a permutation of the 13 features.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, SchemaError> {
        if names.len() != FEATURE_COUNT {
            return Err(SchemaError::WrongLength {
                expected: FEATURE_COUNT,
                actual: names.len(),
            });
        }

        let mut seen = HashSet::with_capacity(FEATURE_COUNT);
        let mut parsed = Vec::with_capacity(FEATURE_COUNT);
        for raw in names {
            let name: FeatureName = raw.as_ref().parse()?;
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateField(name));
            }
            parsed.push(name);
        }

        // 13 distinct known names out of 13 possible: the mapping is total.
        debug_assert!(FeatureName::ALL.iter().all(|n| seen.contains(n)));

        Ok(Self { names: parsed })
    }

    /// The dataset's native column order.
    #[must_use]
    pub fn dataset_default() -> Self {
        Self {
            names: FeatureName::ALL.to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = FeatureName> + '_ {
        self.names.iter().copied()
    }

    #[must_use]
    pub fn names(&self) -> &[FeatureName] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a feature in the canonical vector.
    #[must_use]
    pub fn position(&self, name: FeatureName) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }
}

impl TryFrom<Vec<String>> for FeatureOrder {
    type Error = SchemaError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(&value)
    }
}

impl From<FeatureOrder> for Vec<String> {
    fn from(order: FeatureOrder) -> Self {
        order.names.iter().map(|n| n.as_str().to_string()).collect()
    }
}
