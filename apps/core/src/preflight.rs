//! Preflight Check System
//!
//! Verifies the model artifacts, the storage location and the explanation
//! backend before any assessment is served. Nothing is assumed: every
//! artifact is actually loaded.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::assessment::classifier::{
    load_classifier, load_scaler, DIABETES_MODEL_FILE, HYPERTENSION_MODEL_FILE,
};
use crate::config::AppConfig;
use crate::explain::{ChatCompletionClient, CompletionRequest, ExplanationBackend};

const PING_PROMPT: &str = "Say 'Health Check Passed' if you can hear me.";
const PING_MAX_TOKENS: u32 = 50;

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub critical: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            critical: is_critical_check(name),
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            critical: is_critical_check(name),
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub ready_to_serve: bool,
    pub summary: String,
}

fn is_critical_check(name: &str) -> bool {
    matches!(
        name,
        "model_dir" | "scaler" | "diabetes_model" | "hypertension_model" | "storage_dir"
    )
}

/// Runs every check; with `ping_backend` also sends a short completion to the backend.
pub async fn run_preflight(config: &AppConfig, ping_backend: bool) -> PreflightReport {
    let backend: Option<Arc<dyn ExplanationBackend>> = match (&config.llm_api_key, ping_backend) {
        (Some(api_key), true) => Some(Arc::new(ChatCompletionClient::new(
            config.llm_base_url.clone(),
            config.llm_model.clone(),
            api_key.clone(),
        ))),
        _ => None,
    };
    run_preflight_with(config, ping_backend, backend).await
}

/// Same as [`run_preflight`] with an explicit backend for the ping.
pub async fn run_preflight_with(
    config: &AppConfig,
    ping_backend: bool,
    backend: Option<Arc<dyn ExplanationBackend>>,
) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = vec![check_model_dir(&config.model_dir)];
    checks.push(check_scaler(&config.model_dir));
    checks.push(check_classifier("diabetes_model", &config.model_dir, DIABETES_MODEL_FILE));
    checks.push(check_classifier("hypertension_model", &config.model_dir, HYPERTENSION_MODEL_FILE));
    checks.push(check_storage_dir(&config.storage_path));
    checks.push(check_credential(config.llm_api_key.is_some()));

    if ping_backend {
        checks.push(match backend {
            Some(backend) => check_backend_ping(backend.as_ref()).await,
            None => CheckResult::fail("llm_ping", "Skipped - no credential configured", None),
        });
    }

    let all_passed = checks.iter().all(|c| c.passed);
    let critical_passed = checks.iter().filter(|c| c.critical).all(|c| c.passed);

    let summary = if all_passed {
        "All checks passed. System ready.".to_string()
    } else if critical_passed {
        "Some non-critical checks failed. Assessments will use template guidance.".to_string()
    } else {
        "Critical checks failed. Assessments cannot be served.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  [ok] {}: {}", check.name, check.message);
        } else {
            warn!("  [failed] {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }
    info!("Summary: {}", summary);

    PreflightReport {
        all_passed,
        checks,
        ready_to_serve: critical_passed,
        summary,
    }
}

// --- Individual Checks ---

fn check_model_dir(model_dir: &Path) -> CheckResult {
    if model_dir.is_dir() {
        CheckResult::pass("model_dir", &format!("Found {:?}", model_dir))
    } else {
        CheckResult::fail(
            "model_dir",
            "Model directory not found",
            Some(format!("Expected at: {:?}", model_dir)),
        )
    }
}

fn check_scaler(model_dir: &Path) -> CheckResult {
    match load_scaler(model_dir) {
        Ok(_) => CheckResult::pass("scaler", "Scaler loaded"),
        Err(e) => CheckResult::fail("scaler", "Scaler unavailable", Some(e.to_string())),
    }
}

fn check_classifier(name: &str, model_dir: &Path, file_name: &str) -> CheckResult {
    match load_classifier(model_dir, file_name) {
        Ok(_) => CheckResult::pass(name, &format!("{} loaded", file_name)),
        Err(e) => CheckResult::fail(name, "Classifier unavailable", Some(e.to_string())),
    }
}

fn check_storage_dir(storage_path: &Path) -> CheckResult {
    let Some(dir) = storage_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return CheckResult::pass("storage_dir", "Storage file lives in the working directory");
    };

    if !dir.exists() {
        return CheckResult::pass(
            "storage_dir",
            &format!("{:?} does not exist yet and will be created on first save", dir),
        );
    }
    if !dir.is_dir() {
        return CheckResult::fail(
            "storage_dir",
            "Storage path parent is not a directory",
            Some(format!("{:?}", dir)),
        );
    }

    match fs::metadata(dir) {
        Ok(meta) if meta.permissions().readonly() => CheckResult::fail(
            "storage_dir",
            "Storage directory is read-only",
            Some(format!("{:?}", dir)),
        ),
        Ok(_) => CheckResult::pass("storage_dir", &format!("Writable {:?}", dir)),
        Err(e) => CheckResult::fail(
            "storage_dir",
            "Cannot inspect storage directory",
            Some(e.to_string()),
        ),
    }
}

fn check_credential(present: bool) -> CheckResult {
    if present {
        CheckResult::pass("llm_credential", "HF_TOKEN configured")
    } else {
        CheckResult::fail(
            "llm_credential",
            "HF_TOKEN not set",
            Some("Prevention guidance will use curated templates".to_string()),
        )
    }
}

async fn check_backend_ping(backend: &dyn ExplanationBackend) -> CheckResult {
    let request = CompletionRequest {
        system: "You are a helpful assistant.".to_string(),
        prompt: PING_PROMPT.to_string(),
        temperature: 0.0,
        max_tokens: PING_MAX_TOKENS,
    };

    match backend.complete(request).await {
        Ok(reply) => CheckResult::pass("llm_ping", &format!("Backend replied: {}", reply.trim())),
        Err(e) => CheckResult::fail("llm_ping", "Backend did not respond", Some(e.to_string())),
    }
}
