//! Domain layer: Core prediction types and rules.
//!
//! Pure Rust types with no I/O. Feature schema, input domains, and the
//! decision threshold all live here.

pub mod bounds;
mod decision;
mod features;

pub use bounds::{field_spec, Choice, FieldDomain, FieldSpec, FIELD_SPECS};
pub use decision::{ClassProbabilities, RiskDecision, RiskLabel, DECISION_THRESHOLD};
pub use features::{
    ClinicalFeatures, FeatureName, FeatureOrder, FeatureRecord, SchemaError, Sex, FEATURE_COUNT,
};
