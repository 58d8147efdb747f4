//! Assessment service: the entry point wiring validation, the risk engine and
//! persistence together.
//!
//! All collaborators are built once from [`AppConfig`] and owned here. If the
//! model artifacts cannot be loaded the service still starts, but every
//! assessment is refused with [`AppError::EngineUnavailable`].

use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

use crate::assessment::RiskEngine;
use crate::config::AppConfig;
use crate::diagnostic_log::DiagnosticLog;
use crate::encryption::EncryptionKey;
use crate::error::AppError;
use crate::explain::{ChatCompletionClient, ExplanationBackend, ExplanationEnricher};
use crate::models::{AssessmentResponse, ClinicalInput};
use crate::storage::LocalStorage;

pub enum EngineStatus {
    Ready(RiskEngine),
    Unavailable(String),
}

pub struct AssessmentService {
    engine: EngineStatus,
    storage: LocalStorage,
}

impl AssessmentService {
    pub fn new(engine: EngineStatus, storage: LocalStorage) -> Self {
        Self { engine, storage }
    }

    /// Builds the engine, enricher and storage described by `config`.
    ///
    /// Only storage setup errors are returned; a model loading failure leaves
    /// the service in the unavailable state.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        config.ensure_dirs()?;

        let diagnostics = DiagnosticLog::new(&config.debug_log_path);
        let backend: Option<Arc<dyn ExplanationBackend>> = match &config.llm_api_key {
            Some(api_key) => Some(Arc::new(ChatCompletionClient::new(
                config.llm_base_url.clone(),
                config.llm_model.clone(),
                api_key.clone(),
            ))),
            None => {
                info!("HF_TOKEN not set, prevention guidance will use templates");
                None
            }
        };
        let enricher = ExplanationEnricher::new(backend, diagnostics);

        let engine = match RiskEngine::load(&config.model_dir, enricher) {
            Ok(engine) => EngineStatus::Ready(engine),
            Err(e) => {
                error!("Risk engine failed to load: {}", e);
                EngineStatus::Unavailable(e.to_string())
            }
        };

        let key = EncryptionKey::resolve(config.encryption_passphrase.as_deref(), &config.key_path)?;
        let storage = LocalStorage::new(config.storage_path.clone(), key);

        Ok(Self::new(engine, storage))
    }

    pub fn engine_status(&self) -> &EngineStatus {
        &self.engine
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.engine, EngineStatus::Ready(_))
    }

    fn engine(&self) -> Result<&RiskEngine, AppError> {
        match &self.engine {
            EngineStatus::Ready(engine) => Ok(engine),
            EngineStatus::Unavailable(reason) => Err(AppError::EngineUnavailable(reason.clone())),
        }
    }

    /// Validates, assesses and persists one questionnaire.
    #[instrument(skip_all)]
    pub async fn assess(&self, input: &ClinicalInput) -> Result<AssessmentResponse, AppError> {
        let response = self.assess_without_saving(input).await?;
        self.storage.save(&response)?;
        info!(assessment_id = %response.assessment_id, "Assessment stored");
        Ok(response)
    }

    /// Same as [`assess`](Self::assess) but leaves the storage untouched.
    pub async fn assess_without_saving(&self, input: &ClinicalInput) -> Result<AssessmentResponse, AppError> {
        input.validate()?;
        let engine = self.engine()?;

        let risks = engine.assess(input).await;
        let response = AssessmentResponse::new(risks);
        info!(
            assessment_id = %response.assessment_id,
            risks = response.risks.len(),
            "Assessment completed"
        );
        Ok(response)
    }

    /// Most recent stored assessments, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AssessmentResponse>, AppError> {
        self.storage.load_recent(limit)
    }
}
