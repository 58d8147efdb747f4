//! Process configuration, read once from the environment at startup.
//!
//! Call `dotenv::dotenv()` before [`AppConfig::from_env`] to pick up a local
//! `.env` file. Blank variables are treated as unset.

use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use url::Url;

use crate::error::AppError;

pub const DEFAULT_MODEL_DIR: &str = "ml/models";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DEBUG_LOG: &str = "server_debug.log";
pub const DEFAULT_LLM_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-oss-120b:groq";

const STORAGE_FILE: &str = "assessments.enc";
const KEY_FILE: &str = "secret.key";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub data_dir: PathBuf,
    pub storage_path: PathBuf,
    pub key_path: PathBuf,
    pub encryption_passphrase: Option<String>,
    pub debug_log_path: PathBuf,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_base_url(raw: &str) -> Result<String, AppError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(AppError::Config(format!(
            "HEALTHRISK_LLM_BASE_URL must use http or https, got '{}'",
            other
        ))),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let data_dir = PathBuf::from(var("HEALTHRISK_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let storage_path = var("HEALTHRISK_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(STORAGE_FILE));
        let key_path = var("HEALTHRISK_KEY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(KEY_FILE));

        let llm_base_url = validate_base_url(
            &var("HEALTHRISK_LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
        )?;

        Ok(Self {
            model_dir: PathBuf::from(var("HEALTHRISK_MODEL_DIR").unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string())),
            data_dir,
            storage_path,
            key_path,
            encryption_passphrase: var("ENCRYPTION_KEY"),
            debug_log_path: PathBuf::from(var("HEALTHRISK_DEBUG_LOG").unwrap_or_else(|| DEFAULT_DEBUG_LOG.to_string())),
            llm_api_key: var("HF_TOKEN"),
            llm_base_url,
            llm_model: var("HEALTHRISK_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
        })
    }

    /// Creates the data directory and the parents of the storage and key files.
    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        let mut dirs = vec![self.data_dir.clone()];
        dirs.extend(self.storage_path.parent().map(PathBuf::from));
        dirs.extend(self.key_path.parent().map(PathBuf::from));

        for dir in dirs.into_iter().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(&dir)?;
                info!("Created directory: {:?}", dir);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 9] = [
        "HEALTHRISK_MODEL_DIR",
        "HEALTHRISK_DATA_DIR",
        "HEALTHRISK_STORAGE_PATH",
        "HEALTHRISK_KEY_PATH",
        "ENCRYPTION_KEY",
        "HEALTHRISK_DEBUG_LOG",
        "HF_TOKEN",
        "HEALTHRISK_LLM_BASE_URL",
        "HEALTHRISK_LLM_MODEL",
    ];

    /// Every config variable unset except the given overrides.
    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.to_string());
                (*name, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(env_with(&[]), || {
            let config = AppConfig::from_env().unwrap();

            assert_eq!(config.model_dir, PathBuf::from("ml/models"));
            assert_eq!(config.storage_path, PathBuf::from("data").join("assessments.enc"));
            assert_eq!(config.key_path, PathBuf::from("data").join("secret.key"));
            assert_eq!(config.debug_log_path, PathBuf::from("server_debug.log"));
            assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
            assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
            assert!(config.llm_api_key.is_none());
            assert!(config.encryption_passphrase.is_none());
        });
    }

    #[test]
    fn test_data_dir_moves_storage_and_key() {
        let vars = env_with(&[("HEALTHRISK_DATA_DIR", "/var/lib/healthrisk"), ("HF_TOKEN", "hf_test")]);

        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().unwrap();

            assert_eq!(config.storage_path, PathBuf::from("/var/lib/healthrisk/assessments.enc"));
            assert_eq!(config.key_path, PathBuf::from("/var/lib/healthrisk/secret.key"));
            assert_eq!(config.llm_api_key.as_deref(), Some("hf_test"));
        });
    }

    #[test]
    fn test_blank_values_are_unset() {
        let vars = env_with(&[("HF_TOKEN", "   "), ("ENCRYPTION_KEY", "")]);

        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().unwrap();
            assert!(config.llm_api_key.is_none());
            assert!(config.encryption_passphrase.is_none());
        });
    }

    #[test]
    fn test_invalid_base_url() {
        for bad in ["ftp://example.com", "not a url"] {
            temp_env::with_vars(env_with(&[("HEALTHRISK_LLM_BASE_URL", bad)]), || {
                assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
            });
        }
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let vars = env_with(&[("HEALTHRISK_LLM_BASE_URL", "http://localhost:8080/v1/")]);
        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.llm_base_url, "http://localhost:8080/v1");
        });
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let key_path = dir.path().join("keys").join("secret.key");
        let data_str = data.to_string_lossy().to_string();
        let key_str = key_path.to_string_lossy().to_string();
        let vars = env_with(&[
            ("HEALTHRISK_DATA_DIR", data_str.as_str()),
            ("HEALTHRISK_KEY_PATH", key_str.as_str()),
        ]);

        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().unwrap();
            config.ensure_dirs().unwrap();
        });

        assert!(data.is_dir());
        assert!(dir.path().join("keys").is_dir());
        assert!(!key_path.exists());
    }
}
