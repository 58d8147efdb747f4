//! Shared fixtures: model artifacts and configuration rooted in a temp directory.

use crate::assessment::classifier::{DIABETES_MODEL_FILE, HYPERTENSION_MODEL_FILE, SCALER_FILE};
use crate::assessment::features::FEATURE_COUNT;
use crate::config::{AppConfig, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Identity scaler plus two logistic models driven by a single feature each:
/// diabetes by HbA1c (`p = σ(hba1c - 5)`), hypertension by systolic BP
/// (`p = σ(0.1 * sbp - 12)`).
pub fn write_model_artifacts(model_dir: &Path) {
    fs::create_dir_all(model_dir).unwrap();

    let scaler = json!({
        "mean": vec![0.0; FEATURE_COUNT],
        "scale": vec![1.0; FEATURE_COUNT],
    });
    fs::write(model_dir.join(SCALER_FILE), scaler.to_string()).unwrap();

    let mut diabetes = vec![0.0; FEATURE_COUNT];
    diabetes[4] = 1.0;
    let diabetes = json!({ "kind": "logistic", "coefficients": diabetes, "intercept": -5.0 });
    fs::write(model_dir.join(DIABETES_MODEL_FILE), diabetes.to_string()).unwrap();

    let mut hypertension = vec![0.0; FEATURE_COUNT];
    hypertension[3] = 0.1;
    let hypertension = json!({ "kind": "logistic", "coefficients": hypertension, "intercept": -12.0 });
    fs::write(model_dir.join(HYPERTENSION_MODEL_FILE), hypertension.to_string()).unwrap();
}

/// Template-only configuration with every path under `root`.
pub fn test_config(root: &Path) -> AppConfig {
    let data_dir = root.join("data");
    AppConfig {
        model_dir: root.join("models"),
        storage_path: data_dir.join("assessments.enc"),
        key_path: data_dir.join("secret.key"),
        data_dir,
        encryption_passphrase: None,
        debug_log_path: root.join("server_debug.log"),
        llm_api_key: None,
        llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
        llm_model: DEFAULT_LLM_MODEL.to_string(),
    }
}
