//! Input domains for the collector form.
//!
//! Every value a record can contain is constrained here, before the record
//! exists. There is no cross-field validation.

use super::features::{ClinicalFeatures, FeatureName, FEATURE_COUNT};

/// A selectable option: what the user sees and what the model receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub label: &'static str,
    pub value: f64,
}

/// The set of values a single field accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDomain {
    /// Whole numbers in `[min, max]`
    Integer { min: i64, max: i64 },
    /// Decimals in `[min, max]`, adjusted in `step` increments
    Decimal { min: f64, max: f64, step: f64 },
    /// One of a fixed list; the first entry is the initial selection
    Choice(&'static [Choice]),
}

impl FieldDomain {
    /// Whether `value` is accepted without adjustment.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match *self {
            Self::Integer { min, max } => {
                value.fract() == 0.0 && (min as f64..=max as f64).contains(&value)
            }
            Self::Decimal { min, max, .. } => (min..=max).contains(&value),
            Self::Choice(options) => options.iter().any(|c| c.value == value),
        }
    }

    /// Clamp a numeric value into range. Choice domains snap to the first option
    /// when the value is not one of theirs.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        match *self {
            Self::Integer { min, max } => {
                if value.is_nan() {
                    min as f64
                } else {
                    value.round().clamp(min as f64, max as f64)
                }
            }
            Self::Decimal { min, max, step } => {
                if value.is_nan() {
                    min
                } else {
                    round_to_step(value.clamp(min, max), step)
                }
            }
            Self::Choice(options) => {
                if options.iter().any(|c| c.value == value) {
                    value
                } else {
                    options.first().map_or(value, |c| c.value)
                }
            }
        }
    }

    /// Step size used by the arrow keys on numeric fields.
    #[must_use]
    pub fn step(&self) -> f64 {
        match *self {
            Self::Integer { .. } | Self::Choice(_) => 1.0,
            Self::Decimal { step, .. } => step,
        }
    }

    /// What an out-of-domain value is told, e.g. `Value must be between 1 and 120`.
    #[must_use]
    pub fn requirement(&self) -> String {
        match *self {
            Self::Integer { min, max } => format!("Value must be between {min} and {max}"),
            Self::Decimal { min, max, .. } => {
                format!("Value must be between {min:.1} and {max:.1}")
            }
            Self::Choice(_) => format!("Value must be one of {}", self.describe()),
        }
    }

    /// Human readable bounds, e.g. `1-120` or `0.0-10.0`.
    #[must_use]
    pub fn describe(&self) -> String {
        match *self {
            Self::Integer { min, max } => format!("{min}-{max}"),
            Self::Decimal { min, max, .. } => format!("{min:.1}-{max:.1}"),
            Self::Choice(options) => options
                .iter()
                .map(|c| c.label)
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    // Round through the step count to avoid 0.30000000000000004-style drift.
    let decimals = (-step.log10()).ceil().max(0.0) as i32;
    let factor = 10f64.powi(decimals);
    ((value / step).round() * step * factor).round() / factor
}

/// Static description of one collector field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: FeatureName,
    pub label: &'static str,
    pub hint: &'static str,
    pub domain: FieldDomain,
}

impl FieldSpec {
    /// The field's initial value, taken from [`ClinicalFeatures::default`].
    #[must_use]
    pub fn default_value(&self) -> f64 {
        ClinicalFeatures::default().value(self.name)
    }
}

pub const AGE_RANGE: (i64, i64) = (1, 120);
pub const RESTING_BP_RANGE: (i64, i64) = (80, 200);
pub const CHOLESTEROL_RANGE: (i64, i64) = (100, 600);
pub const MAX_HEART_RATE_RANGE: (i64, i64) = (60, 250);
pub const ST_DEPRESSION_RANGE: (f64, f64) = (0.0, 10.0);
pub const ST_DEPRESSION_STEP: f64 = 0.1;

const SEX_CHOICES: &[Choice] = &[
    Choice { label: "Female", value: 0.0 },
    Choice { label: "Male", value: 1.0 },
];

const BINARY_CHOICES: &[Choice] = &[
    Choice { label: "0", value: 0.0 },
    Choice { label: "1", value: 1.0 },
];

const CHOICES_0_TO_2: &[Choice] = &[
    Choice { label: "0", value: 0.0 },
    Choice { label: "1", value: 1.0 },
    Choice { label: "2", value: 2.0 },
];

const CHOICES_0_TO_3: &[Choice] = &[
    Choice { label: "0", value: 0.0 },
    Choice { label: "1", value: 1.0 },
    Choice { label: "2", value: 2.0 },
    Choice { label: "3", value: 3.0 },
];

const THAL_CHOICES: &[Choice] = &[
    Choice { label: "1", value: 1.0 },
    Choice { label: "2", value: 2.0 },
    Choice { label: "3", value: 3.0 },
];

/// Collector fields, in [`FeatureName::ALL`] order.
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: FeatureName::Age,
        label: "Age",
        hint: "years (1-120)",
        domain: FieldDomain::Integer { min: AGE_RANGE.0, max: AGE_RANGE.1 },
    },
    FieldSpec {
        name: FeatureName::Sex,
        label: "Sex",
        hint: "Female / Male",
        domain: FieldDomain::Choice(SEX_CHOICES),
    },
    FieldSpec {
        name: FeatureName::Cp,
        label: "Chest Pain Type",
        hint: "0-3",
        domain: FieldDomain::Choice(CHOICES_0_TO_3),
    },
    FieldSpec {
        name: FeatureName::Trestbps,
        label: "Resting Blood Pressure",
        hint: "mmHg (80-200)",
        domain: FieldDomain::Integer {
            min: RESTING_BP_RANGE.0,
            max: RESTING_BP_RANGE.1,
        },
    },
    FieldSpec {
        name: FeatureName::Chol,
        label: "Cholesterol",
        hint: "mg/dl (100-600)",
        domain: FieldDomain::Integer {
            min: CHOLESTEROL_RANGE.0,
            max: CHOLESTEROL_RANGE.1,
        },
    },
    FieldSpec {
        name: FeatureName::Fbs,
        label: "Fasting Blood Sugar > 120",
        hint: "0=no, 1=yes",
        domain: FieldDomain::Choice(BINARY_CHOICES),
    },
    FieldSpec {
        name: FeatureName::Restecg,
        label: "Resting ECG",
        hint: "0-2",
        domain: FieldDomain::Choice(CHOICES_0_TO_2),
    },
    FieldSpec {
        name: FeatureName::Thalach,
        label: "Max Heart Rate",
        hint: "bpm (60-250)",
        domain: FieldDomain::Integer {
            min: MAX_HEART_RATE_RANGE.0,
            max: MAX_HEART_RATE_RANGE.1,
        },
    },
    FieldSpec {
        name: FeatureName::Exang,
        label: "Exercise Induced Angina",
        hint: "1=yes, 0=no",
        domain: FieldDomain::Choice(BINARY_CHOICES),
    },
    FieldSpec {
        name: FeatureName::Oldpeak,
        label: "ST Depression",
        hint: "0.0-10.0",
        domain: FieldDomain::Decimal {
            min: ST_DEPRESSION_RANGE.0,
            max: ST_DEPRESSION_RANGE.1,
            step: ST_DEPRESSION_STEP,
        },
    },
    FieldSpec {
        name: FeatureName::Slope,
        label: "Slope of ST Segment",
        hint: "0-2",
        domain: FieldDomain::Choice(CHOICES_0_TO_2),
    },
    FieldSpec {
        name: FeatureName::Ca,
        label: "Major Vessels",
        hint: "0-3",
        domain: FieldDomain::Choice(CHOICES_0_TO_3),
    },
    FieldSpec {
        name: FeatureName::Thal,
        label: "Thalassemia",
        hint: "1=normal, 2=fixed, 3=reversible",
        domain: FieldDomain::Choice(THAL_CHOICES),
    },
];

/// Look up the collector field for a feature.
#[must_use]
pub fn field_spec(name: FeatureName) -> &'static FieldSpec {
    // FIELD_SPECS is indexed in FeatureName::ALL order.
    &FIELD_SPECS[name as usize]
}

impl ClinicalFeatures {
    /// Check every field against its collector domain.
    ///
    /// # Errors
    /// Returns one message per out-of-domain field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = FIELD_SPECS
            .iter()
            .filter(|spec| !spec.domain.contains(self.value(spec.name)))
            .map(|spec| format!("{}: {}", spec.label, spec.domain.requirement()))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_follow_feature_order() {
        for (spec, name) in FIELD_SPECS.iter().zip(FeatureName::ALL) {
            assert_eq!(spec.name, name);
            assert_eq!(field_spec(name).name, name);
        }
    }

    #[test]
    fn test_defaults_are_in_domain() {
        for spec in &FIELD_SPECS {
            assert!(
                spec.domain.contains(spec.default_value()),
                "default for {} outside domain",
                spec.name
            );
        }
        assert!(ClinicalFeatures::default().validate().is_ok());
    }

    #[test]
    fn test_age_and_cholesterol_bounds() {
        let age = field_spec(FeatureName::Age).domain;
        assert!(age.contains(1.0));
        assert!(age.contains(120.0));
        assert!(!age.contains(0.0));
        assert!(!age.contains(121.0));
        assert!(!age.contains(50.5));
        assert_eq!(age.clamp(150.0), 120.0);
        assert_eq!(age.clamp(-3.0), 1.0);

        let chol = field_spec(FeatureName::Chol).domain;
        assert!(!chol.contains(99.0));
        assert!(!chol.contains(601.0));
        assert_eq!(chol.clamp(50.0), 100.0);
        assert_eq!(chol.clamp(1000.0), 600.0);
    }

    #[test]
    fn test_decimal_clamp_snaps_to_step() {
        let oldpeak = field_spec(FeatureName::Oldpeak).domain;
        assert_eq!(oldpeak.clamp(0.1 + 0.2), 0.3);
        assert_eq!(oldpeak.clamp(12.0), 10.0);
        assert_eq!(oldpeak.clamp(-0.5), 0.0);
        assert!((oldpeak.step() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_choice_domain() {
        let thal = field_spec(FeatureName::Thal).domain;
        assert!(thal.contains(3.0));
        assert!(!thal.contains(0.0));
        assert_eq!(thal.clamp(0.0), 1.0);
        assert_eq!(thal.describe(), "1/2/3");
    }

    #[test]
    fn test_validate_rejects_fractional_and_unknown_codes() {
        let features = ClinicalFeatures {
            trestbps: 120.5,
            thal: 0.0,
            ..Default::default()
        };
        let errors = features.validate().expect_err("Should fail");
        assert_eq!(
            errors,
            vec![
                "Resting Blood Pressure: Value must be between 80 and 200".to_string(),
                "Thalassemia: Value must be one of 1/2/3".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_reports_each_field() {
        let features = ClinicalFeatures {
            age: 0.0,
            chol: 700.0,
            ..Default::default()
        };
        let errors = features.validate().expect_err("Should fail");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "Age: Value must be between 1 and 120");
        assert_eq!(errors[1], "Cholesterol: Value must be between 100 and 600");
        assert!(errors[0].starts_with("Age"));
        assert!(errors[1].starts_with("Cholesterol"));
    }
}
