// HealthRisk core: questionnaire in, ranked and explained risks out.
// Classifier inference, screening rules, prevention guidance, encrypted history.

pub mod assessment;
pub mod config;
pub mod diagnostic_log;
pub mod encryption;
pub mod error;
pub mod explain;
pub mod models;
pub mod preflight;
pub mod service;
pub mod storage;

pub use config::AppConfig;
pub use error::AppError;
pub use models::{AssessmentResponse, ClinicalInput, DiseaseRisk, RiskLevel};
pub use service::AssessmentService;

#[cfg(test)]
mod tests;
