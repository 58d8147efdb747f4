//! Feature Encoder.
//!
//! Maps a validated [`ClinicalInput`] to the numeric vector the classifiers
//! were trained on. The order is fixed and must match training.

use crate::models::ClinicalInput;

/// Number of features consumed by the classifiers.
pub const FEATURE_COUNT: usize = 9;

/// NHANES column codes, in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "RIDAGEYR", // age
    "RIAGENDR", // gender code
    "BMXBMI",   // BMI
    "BPXSY1",   // systolic BP
    "LBXGH",    // HbA1c
    "LBXTC",    // total cholesterol
    "PAQ650",   // vigorous activity (1 = yes, 2 = no)
    "SLD010H",  // sleep hours
    "SMQ020",   // smoked (1 = yes, 2 = no)
];

/// Raw (unscaled) feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// NHANES yes/no coding.
fn yes_no_code(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        2.0
    }
}

/// Builds the classifier feature vector from a questionnaire.
pub fn encode(input: &ClinicalInput) -> FeatureVector {
    FeatureVector([
        f64::from(input.age),
        f64::from(input.gender.code()),
        input.bmi,
        f64::from(input.systolic_bp),
        input.hba1c,
        f64::from(input.cholesterol),
        yes_no_code(input.vigorous_activity),
        input.sleep_hours,
        yes_no_code(input.smoker_history),
    ])
}

/// Resolves a feature reference (`f4` or an NHANES code such as `LBXGH`) to its index.
pub fn feature_index(name: &str) -> Option<usize> {
    if let Some(index) = name
        .strip_prefix('f')
        .and_then(|digits| digits.parse::<usize>().ok())
    {
        return (index < FEATURE_COUNT).then_some(index);
    }
    FEATURE_NAMES.iter().position(|code| *code == name)
}
