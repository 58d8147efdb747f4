use std::path::Path;
use tracing::{debug, instrument};

use super::aggregator::aggregate;
use super::classifier::ClassifierAdapter;
use super::screening::ScreeningRuleEngine;
use super::traits::RiskEvaluator;
use crate::error::AppError;
use crate::explain::ExplanationEnricher;
use crate::models::{ClinicalInput, DiseaseRisk};

/// The full risk pipeline: classifiers and screening rules, aggregation, enrichment.
///
/// Read-only after construction, so one engine can serve concurrent requests.
pub struct RiskEngine {
    classifiers: Box<dyn RiskEvaluator>,
    screening: Box<dyn RiskEvaluator>,
    enricher: ExplanationEnricher,
}

impl RiskEngine {
    pub fn new(
        classifiers: Box<dyn RiskEvaluator>,
        screening: Box<dyn RiskEvaluator>,
        enricher: ExplanationEnricher,
    ) -> Self {
        Self {
            classifiers,
            screening,
            enricher,
        }
    }

    /// Loads the classifier artifacts from `model_dir` and pairs them with the screening rules.
    pub fn load(model_dir: &Path, enricher: ExplanationEnricher) -> Result<Self, AppError> {
        let adapter = ClassifierAdapter::load(model_dir)?;
        Ok(Self::new(
            Box::new(adapter),
            Box::new(ScreeningRuleEngine::new()),
            enricher,
        ))
    }

    /// Numeric part of the pipeline, ordered by descending probability.
    pub fn score(&self, input: &ClinicalInput) -> Vec<DiseaseRisk> {
        let classifier_risks = self.classifiers.evaluate(input);
        let screening_risks = self.screening.evaluate(input);
        debug!(
            classifier = classifier_risks.len(),
            screening = screening_risks.len(),
            "Scored risks"
        );
        aggregate(classifier_risks, screening_risks)
    }

    /// Scores the input and enriches the ranked risks with prevention guidance.
    #[instrument(skip_all)]
    pub async fn assess(&self, input: &ClinicalInput) -> Vec<DiseaseRisk> {
        let risks = self.score(input);
        self.enricher.enrich(risks, input).await
    }
}
