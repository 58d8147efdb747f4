use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::prompt::{build_prompt, MAX_TOKENS, SYSTEM_INSTRUCTION, TEMPERATURE};
use super::repair::{repair_json, strip_code_fences};
use super::templates::template_fallback;
use super::traits::{CompletionRequest, ExplanationBackend};
use crate::diagnostic_log::DiagnosticLog;
use crate::error::AppError;
use crate::models::{ClinicalInput, DiseaseRisk};

/// Generated prevention steps keyed by disease name.
pub type AdviceMap = HashMap<String, Vec<String>>;

/// Parses a raw completion into an [`AdviceMap`].
///
/// Code fences are stripped first. If the text still does not parse, it is
/// repaired once and parsed again. Only a reply that is not a JSON object is
/// an error; entries without a string-array `prevention_steps` are skipped.
pub fn parse_advice(raw: &str) -> Result<AdviceMap, AppError> {
    let cleaned = strip_code_fences(raw);
    let object = match serde_json::from_str::<Map<String, Value>>(&cleaned) {
        Ok(object) => object,
        Err(_) => serde_json::from_str(&repair_json(&cleaned))?,
    };

    let advice = object
        .into_iter()
        .filter_map(|(disease, entry)| {
            let steps = entry
                .get("prevention_steps")
                .cloned()
                .and_then(|steps| serde_json::from_value::<Vec<String>>(steps).ok());
            if steps.is_none() {
                debug!("Ignoring advice entry without prevention steps: {}", disease);
            }
            steps.map(|steps| (disease, steps))
        })
        .collect();

    Ok(advice)
}

/// Applies generated steps to the matching risks. Order and every other field are preserved.
pub fn merge_advice(risks: Vec<DiseaseRisk>, advice: &AdviceMap) -> Vec<DiseaseRisk> {
    risks
        .into_iter()
        .map(|risk| match advice.get(&risk.disease) {
            Some(steps) => risk.with_prevention_steps(steps.clone()),
            None => risk,
        })
        .collect()
}

/// Replaces default prevention steps with generated or curated guidance.
///
/// Enrichment never fails: a missing backend, a backend error or a reply
/// that is not a JSON object all end in [`template_fallback`].
pub struct ExplanationEnricher {
    backend: Option<Arc<dyn ExplanationBackend>>,
    diagnostics: DiagnosticLog,
}

impl ExplanationEnricher {
    pub fn new(backend: Option<Arc<dyn ExplanationBackend>>, diagnostics: DiagnosticLog) -> Self {
        Self {
            backend,
            diagnostics,
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    #[instrument(skip_all, fields(risks = risks.len()))]
    pub async fn enrich(&self, risks: Vec<DiseaseRisk>, profile: &ClinicalInput) -> Vec<DiseaseRisk> {
        let Some(backend) = &self.backend else {
            self.diagnostics.write("ERROR: API key missing.");
            info!("No explanation backend configured, using templates");
            return template_fallback(risks);
        };

        let prompt = build_prompt(&risks, profile);
        self.diagnostics.write(&format!("PROMPT SENT:\n{}", prompt));

        let request = CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let raw = match backend.complete(request).await {
            Ok(raw) => raw,
            Err(e) => {
                self.diagnostics.write(&format!("EXCEPTION CAUGHT: {}", e));
                warn!("Explanation backend failed, using templates: {}", e);
                return template_fallback(risks);
            }
        };
        self.diagnostics.write(&format!("RAW RESPONSE:\n{}", raw));

        match parse_advice(&raw) {
            Ok(advice) => {
                info!("Applied generated advice for {} diseases", advice.len());
                merge_advice(risks, &advice)
            }
            Err(e) => {
                self.diagnostics.write(&format!("EXCEPTION CAUGHT: {}", e));
                warn!("Unusable explanation response, using templates: {}", e);
                template_fallback(risks)
            }
        }
    }
}
