//! Classifier Adapter.
//!
//! Wraps the pre-fitted scaler and the two binary classifiers (Type 2
//! Diabetes, Hypertension). Artifacts are JSON files loaded once at startup;
//! any missing or malformed artifact makes construction fail with
//! [`AppError::ModelUnavailable`].
//!
//! Two classifier formats are understood:
//! - `logistic`: coefficients + intercept
//! - `gradient_boosted_trees`: an XGBoost JSON tree dump with a base score

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::features::{encode, feature_index, FeatureVector, FEATURE_COUNT};
use super::traits::RiskEvaluator;
use crate::error::AppError;
use crate::models::{ClinicalInput, DiseaseRisk, RiskLevel};

pub const SCALER_FILE: &str = "scaler.json";
pub const DIABETES_MODEL_FILE: &str = "diabetes_model.json";
pub const HYPERTENSION_MODEL_FILE: &str = "hypertension_model.json";

pub const TYPE_2_DIABETES: &str = "Type 2 Diabetes";
pub const HYPERTENSION: &str = "Hypertension";

const HIGH_BMI_THRESHOLD: f64 = 30.0;
const GENERAL_RISK_FACTOR: &str = "General Risk Profile";
const CONSULT_STEP: &str = "Consult your doctor for a checkup.";
const URGENT_STEP: &str = "Prioritize lifestyle changes immediately.";

// --- Scaler ---

/// Fitted standardization transform: `(x - mean) / scale`.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, AppError> {
        let scaler = Self { mean, scale };
        scaler.check()?;
        Ok(scaler)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AppError::ModelUnavailable(format!(
                "scaler expects {} features, got mean={} scale={}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(AppError::ModelUnavailable(
                "scaler contains a zero or non-finite scale".to_string(),
            ));
        }
        Ok(())
    }

    pub fn transform(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, value) in features.as_slice().iter().enumerate() {
            scaled[i] = (value - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

// --- Classifiers ---

/// A binary model returning the probability of the positive class.
pub trait ProbabilisticClassifier: Send + Sync {
    fn positive_probability(&self, scaled: &[f64]) -> f64;
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Logistic regression over scaled features.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, AppError> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(AppError::ModelUnavailable(format!(
                "logistic model expects {} coefficients, got {}",
                FEATURE_COUNT,
                coefficients.len()
            )));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl ProbabilisticClassifier for LogisticModel {
    fn positive_probability(&self, scaled: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(scaled)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        sigmoid(z)
    }
}

/// One node of an XGBoost JSON dump.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        nodeid: u32,
        split: String,
        split_condition: f64,
        yes: u32,
        no: u32,
        children: Vec<TreeNode>,
    },
    Leaf {
        nodeid: u32,
        leaf: f64,
    },
}

impl TreeNode {
    fn node_id(&self) -> u32 {
        match self {
            TreeNode::Split { nodeid, .. } | TreeNode::Leaf { nodeid, .. } => *nodeid,
        }
    }
}

/// Tree with features and child links resolved.
#[derive(Debug, Clone)]
enum CompiledNode {
    Split {
        feature: usize,
        threshold: f64,
        yes: Box<CompiledNode>,
        no: Box<CompiledNode>,
    },
    Leaf(f64),
}

impl CompiledNode {
    fn compile(node: &TreeNode) -> Result<Self, AppError> {
        match node {
            TreeNode::Leaf { leaf, .. } => Ok(CompiledNode::Leaf(*leaf)),
            TreeNode::Split {
                nodeid,
                split,
                split_condition,
                yes,
                no,
                children,
            } => {
                let feature = feature_index(split).ok_or_else(|| {
                    AppError::ModelUnavailable(format!(
                        "tree node {} splits on unknown feature '{}'",
                        nodeid, split
                    ))
                })?;
                let child = |id: u32| {
                    children
                        .iter()
                        .find(|c| c.node_id() == id)
                        .ok_or_else(|| {
                            AppError::ModelUnavailable(format!(
                                "tree node {} references missing child {}",
                                nodeid, id
                            ))
                        })
                };
                Ok(CompiledNode::Split {
                    feature,
                    threshold: *split_condition,
                    yes: Box::new(Self::compile(child(*yes)?)?),
                    no: Box::new(Self::compile(child(*no)?)?),
                })
            }
        }
    }

    fn leaf_value(&self, scaled: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                CompiledNode::Leaf(value) => return *value,
                CompiledNode::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                } => {
                    node = if scaled[*feature] < *threshold { &**yes } else { &**no };
                }
            }
        }
    }
}

/// Gradient-boosted tree ensemble with a logistic link.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    base_margin: f64,
    trees: Vec<CompiledNode>,
}

impl TreeEnsemble {
    pub fn new(base_score: f64, trees: &[TreeNode]) -> Result<Self, AppError> {
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(AppError::ModelUnavailable(format!(
                "base_score must lie strictly between 0 and 1, got {}",
                base_score
            )));
        }
        let trees = trees
            .iter()
            .map(CompiledNode::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            base_margin: (base_score / (1.0 - base_score)).ln(),
            trees,
        })
    }
}

impl ProbabilisticClassifier for TreeEnsemble {
    fn positive_probability(&self, scaled: &[f64]) -> f64 {
        let margin = self.base_margin
            + self
                .trees
                .iter()
                .map(|tree| tree.leaf_value(scaled))
                .sum::<f64>();
        sigmoid(margin)
    }
}

/// On-disk classifier description, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    GradientBoostedTrees {
        #[serde(default = "default_base_score")]
        base_score: f64,
        trees: Vec<TreeNode>,
    },
}

fn default_base_score() -> f64 {
    0.5
}

impl ClassifierArtifact {
    pub fn into_classifier(self) -> Result<Box<dyn ProbabilisticClassifier>, AppError> {
        match self {
            ClassifierArtifact::Logistic {
                coefficients,
                intercept,
            } => Ok(Box::new(LogisticModel::new(coefficients, intercept)?)),
            ClassifierArtifact::GradientBoostedTrees { base_score, trees } => {
                Ok(Box::new(TreeEnsemble::new(base_score, &trees)?))
            }
        }
    }
}

/// Reads and deserializes one artifact from the model directory.
pub fn load_artifact<T: DeserializeOwned>(model_dir: &Path, file_name: &str) -> Result<T, AppError> {
    let path = model_dir.join(file_name);
    if !path.exists() {
        return Err(AppError::ModelUnavailable(format!(
            "Model {} not found in {:?}. Train models first.",
            file_name, model_dir
        )));
    }
    let raw = fs::read_to_string(&path).map_err(|e| {
        AppError::ModelUnavailable(format!("Model {} could not be read: {}", file_name, e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::ModelUnavailable(format!("Model {} is malformed: {}", file_name, e))
    })
}

/// Loads and checks `scaler.json`.
pub fn load_scaler(model_dir: &Path) -> Result<Scaler, AppError> {
    let scaler: Scaler = load_artifact(model_dir, SCALER_FILE)?;
    scaler.check()?;
    Ok(scaler)
}

/// Loads one classifier file and compiles it.
pub fn load_classifier(model_dir: &Path, file_name: &str) -> Result<Box<dyn ProbabilisticClassifier>, AppError> {
    load_artifact::<ClassifierArtifact>(model_dir, file_name)?.into_classifier()
}

// --- Adapter ---

/// Positive-class probabilities for both classifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierProbabilities {
    pub diabetes: f64,
    pub hypertension: f64,
}

/// Scaler plus the two disease classifiers. Read-only after construction.
pub struct ClassifierAdapter {
    scaler: Scaler,
    diabetes: Box<dyn ProbabilisticClassifier>,
    hypertension: Box<dyn ProbabilisticClassifier>,
}

impl ClassifierAdapter {
    pub fn new(
        scaler: Scaler,
        diabetes: Box<dyn ProbabilisticClassifier>,
        hypertension: Box<dyn ProbabilisticClassifier>,
    ) -> Self {
        Self {
            scaler,
            diabetes,
            hypertension,
        }
    }

    /// Loads `scaler.json`, `diabetes_model.json` and `hypertension_model.json`.
    pub fn load(model_dir: &Path) -> Result<Self, AppError> {
        info!("Loading model artifacts from {:?}", model_dir);

        let scaler = load_scaler(model_dir)?;
        let diabetes = load_classifier(model_dir, DIABETES_MODEL_FILE)?;
        let hypertension = load_classifier(model_dir, HYPERTENSION_MODEL_FILE)?;

        info!("Model artifacts loaded");
        Ok(Self::new(scaler, diabetes, hypertension))
    }

    pub fn assess(&self, features: &FeatureVector) -> ClassifierProbabilities {
        let scaled = self.scaler.transform(features);
        ClassifierProbabilities {
            diabetes: self.diabetes.positive_probability(&scaled),
            hypertension: self.hypertension.positive_probability(&scaled),
        }
    }
}

impl RiskEvaluator for ClassifierAdapter {
    fn evaluate(&self, input: &ClinicalInput) -> Vec<DiseaseRisk> {
        let probabilities = self.assess(&encode(input));
        vec![
            build_risk(&DIABETES_DOMAIN, probabilities.diabetes, input),
            build_risk(&HYPERTENSION_DOMAIN, probabilities.hypertension, input),
        ]
    }
}

// --- Risk construction ---

/// Clinical measurement used to justify a classifier-backed risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClinicalDriver {
    HbA1c,
    SystolicBp,
}

impl ClinicalDriver {
    pub fn label(&self) -> &'static str {
        match self {
            ClinicalDriver::HbA1c => "HbA1c",
            ClinicalDriver::SystolicBp => "Systolic BP",
        }
    }

    pub fn value(&self, input: &ClinicalInput) -> f64 {
        match self {
            ClinicalDriver::HbA1c => input.hba1c,
            ClinicalDriver::SystolicBp => f64::from(input.systolic_bp),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifierDomain {
    pub disease: &'static str,
    pub driver: ClinicalDriver,
    pub threshold: f64,
}

pub const DIABETES_DOMAIN: ClassifierDomain = ClassifierDomain {
    disease: TYPE_2_DIABETES,
    driver: ClinicalDriver::HbA1c,
    threshold: 6.0,
};

pub const HYPERTENSION_DOMAIN: ClassifierDomain = ClassifierDomain {
    disease: HYPERTENSION,
    driver: ClinicalDriver::SystolicBp,
    threshold: 130.0,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turns a classifier probability into a risk with factors and default steps.
pub fn build_risk(domain: &ClassifierDomain, probability: f64, input: &ClinicalInput) -> DiseaseRisk {
    let level = RiskLevel::from_probability(probability);

    let mut factors = Vec::new();
    if domain.driver.value(input) > domain.threshold {
        factors.push(format!("Elevated {}", domain.driver.label()));
    }
    if input.bmi > HIGH_BMI_THRESHOLD {
        factors.push("High BMI".to_string());
    }
    if factors.is_empty() {
        factors.push(GENERAL_RISK_FACTOR.to_string());
    }

    let mut steps = vec![CONSULT_STEP.to_string()];
    if level == RiskLevel::High {
        steps.push(URGENT_STEP.to_string());
    }

    DiseaseRisk::new(domain.disease, level, round2(probability), factors, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::baseline_input;
    use serde_json::json;
    use tempfile::tempdir;

    struct Constant(f64);

    impl ProbabilisticClassifier for Constant {
        fn positive_probability(&self, _scaled: &[f64]) -> f64 {
            self.0
        }
    }

    fn identity_scaler() -> Scaler {
        Scaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]).unwrap()
    }

    #[test]
    fn test_scaler_transform() {
        let mut mean = vec![0.0; FEATURE_COUNT];
        let mut scale = vec![1.0; FEATURE_COUNT];
        mean[0] = 40.0;
        scale[0] = 10.0;
        let scaler = Scaler::new(mean, scale).unwrap();

        let scaled = scaler.transform(&encode(&baseline_input()));
        assert!((scaled[0] - 0.5).abs() < 1e-9);
        assert_eq!(scaled[4], 5.2);
    }

    #[test]
    fn test_scaler_rejects_bad_shapes() {
        assert!(Scaler::new(vec![0.0; 3], vec![1.0; 3]).is_err());
        assert!(Scaler::new(vec![0.0; FEATURE_COUNT], vec![0.0; FEATURE_COUNT]).is_err());
    }

    #[test]
    fn test_logistic_probability() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[4] = 1.0;
        let model = LogisticModel::new(coefficients, -5.2).unwrap();

        let scaled = identity_scaler().transform(&encode(&baseline_input()));
        let p = model.positive_probability(&scaled);
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tree_ensemble_from_xgboost_dump() {
        let artifact: ClassifierArtifact = serde_json::from_value(json!({
            "kind": "gradient_boosted_trees",
            "base_score": 0.5,
            "trees": [{
                "nodeid": 0, "depth": 0, "split": "LBXGH", "split_condition": 6.5,
                "yes": 1, "no": 2, "missing": 1,
                "children": [
                    { "nodeid": 1, "leaf": -1.0 },
                    { "nodeid": 2, "leaf": 2.0 }
                ]
            }]
        }))
        .unwrap();
        let model = artifact.into_classifier().unwrap();

        let mut input = baseline_input();
        let scaler = identity_scaler();
        let low = model.positive_probability(&scaler.transform(&encode(&input)));
        input.hba1c = 7.2;
        let high = model.positive_probability(&scaler.transform(&encode(&input)));

        assert!((low - sigmoid(-1.0)).abs() < 1e-9);
        assert!((high - sigmoid(2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tree_with_dangling_child_is_rejected() {
        let artifact: ClassifierArtifact = serde_json::from_value(json!({
            "kind": "gradient_boosted_trees",
            "trees": [{
                "nodeid": 0, "split": "f4", "split_condition": 6.5, "yes": 1, "no": 7,
                "children": [{ "nodeid": 1, "leaf": 0.1 }]
            }]
        }))
        .unwrap();

        assert!(matches!(artifact.into_classifier(), Err(AppError::ModelUnavailable(_))));
    }

    #[test]
    fn test_load_missing_scaler_fails() {
        let dir = tempdir().unwrap();
        let result = ClassifierAdapter::load(dir.path());

        match result {
            Err(AppError::ModelUnavailable(msg)) => assert!(msg.contains(SCALER_FILE)),
            _ => panic!("Expected ModelUnavailable"),
        }
    }

    #[test]
    fn test_load_malformed_classifier_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SCALER_FILE),
            json!({ "mean": vec![0.0; FEATURE_COUNT], "scale": vec![1.0; FEATURE_COUNT] }).to_string(),
        )
        .unwrap();
        fs::write(dir.path().join(DIABETES_MODEL_FILE), "{ not json").unwrap();

        assert!(matches!(
            ClassifierAdapter::load(dir.path()),
            Err(AppError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_build_risk_factors() {
        let mut input = baseline_input();
        input.hba1c = 7.2;
        input.bmi = 32.0;

        let risk = build_risk(&DIABETES_DOMAIN, 0.8234, &input);

        assert_eq!(risk.disease, TYPE_2_DIABETES);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.probability, 0.82);
        assert_eq!(risk.contributing_factors, vec!["Elevated HbA1c", "High BMI"]);
        assert_eq!(risk.prevention_steps, vec![CONSULT_STEP, URGENT_STEP]);
    }

    #[test]
    fn test_build_risk_general_profile() {
        let risk = build_risk(&HYPERTENSION_DOMAIN, 0.55, &baseline_input());

        assert_eq!(risk.risk_level, RiskLevel::Moderate);
        assert_eq!(risk.contributing_factors, vec![GENERAL_RISK_FACTOR]);
        assert_eq!(risk.prevention_steps, vec![CONSULT_STEP]);
    }

    #[test]
    fn test_driver_threshold_is_strict() {
        let mut input = baseline_input();
        input.systolic_bp = 130;
        let at_threshold = build_risk(&HYPERTENSION_DOMAIN, 0.3, &input);
        assert_eq!(at_threshold.contributing_factors, vec![GENERAL_RISK_FACTOR]);

        input.systolic_bp = 131;
        let above = build_risk(&HYPERTENSION_DOMAIN, 0.3, &input);
        assert_eq!(above.contributing_factors, vec!["Elevated Systolic BP"]);
    }

    #[test]
    fn test_adapter_evaluates_both_diseases() {
        let adapter = ClassifierAdapter::new(
            identity_scaler(),
            Box::new(Constant(0.9)),
            Box::new(Constant(0.2)),
        );

        let risks = adapter.evaluate(&baseline_input());

        assert_eq!(risks.len(), 2);
        assert_eq!(risks[0].disease, TYPE_2_DIABETES);
        assert_eq!(risks[0].risk_level, RiskLevel::High);
        assert_eq!(risks[1].disease, HYPERTENSION);
        assert_eq!(risks[1].risk_level, RiskLevel::Low);
    }
}
