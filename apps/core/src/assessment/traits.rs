use crate::models::{ClinicalInput, DiseaseRisk};

/// A scoring strategy that turns a questionnaire into risks.
///
/// Implemented by the deterministic screening rules and by the classifier
/// adapter, so either side can be swapped without touching the engine.
pub trait RiskEvaluator: Send + Sync {
    /// Scores the input. Every call returns the evaluator's full, fixed set of risks.
    fn evaluate(&self, input: &ClinicalInput) -> Vec<DiseaseRisk>;
}
