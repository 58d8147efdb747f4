use serde::Serialize;

use crate::models::{ClinicalInput, DiseaseRisk, RiskLevel};

pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert Preventive Health Advisor. You output STRICT JSON only.";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 4000;

const UNKNOWN_PROFILE: &str = "Unknown Profile";

#[derive(Serialize)]
struct RiskSummary<'a> {
    disease: &'a str,
    severity: RiskLevel,
    drivers: &'a [String],
}

/// Builds the user prompt asking for five personalized steps per risk.
pub fn build_prompt(risks: &[DiseaseRisk], profile: &ClinicalInput) -> String {
    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| UNKNOWN_PROFILE.to_string());

    let summary: Vec<RiskSummary> = risks
        .iter()
        .map(|risk| RiskSummary {
            disease: &risk.disease,
            severity: risk.risk_level,
            drivers: &risk.contributing_factors,
        })
        .collect();
    let summary_json = serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a preventive health consultant writing personalized, practical advice.

### 1. PATIENT PROFILE
{profile_json}

### 2. IDENTIFIED RISKS
{summary_json}

### 3. TASK
For EACH disease listed above, write exactly 5 concrete prevention or mitigation steps.

### 4. RULES
1. Personalize: use the profile (age, sleep, activity, measurements) instead of generic advice.
   A sedentary 25-year-old and a sedentary 60-year-old need different exercise suggestions.
2. Each step names an action, explains why it helps THIS person (cite their metrics) and states the expected outcome.
3. Order the steps from most to least impactful.
4. Do not diagnose. Add simple caveats where relevant (e.g. "if knees allow").

### 5. OUTPUT FORMAT
Return STRICT JSON only: an object keyed by the exact disease name, each value holding a
"prevention_steps" array of 5 strings formatted as
"**[Action]**: [Detailed instruction]. *Why*: [Rationale]. *Result*: [Outcome]."

Example:
{{
  "Type 2 Diabetes": {{
    "prevention_steps": [
      "**Start Post-Meal Walks**: Walk for 10 mins after dinner. *Why*: Your HbA1c is 5.8 and you sit 8h/day. *Result*: Blunted glucose spike.",
      "... (5 items)"
    ]
  }}
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::baseline_input;

    #[test]
    fn test_prompt_embeds_profile_and_risks() {
        let risks = vec![DiseaseRisk::new(
            "Hypertension",
            RiskLevel::High,
            0.82,
            vec!["Elevated Systolic BP".to_string()],
            vec![],
        )];

        let prompt = build_prompt(&risks, &baseline_input());

        assert!(prompt.contains("\"systolic_bp\": 118"));
        assert!(prompt.contains("\"disease\": \"Hypertension\""));
        assert!(prompt.contains("\"severity\": \"High\""));
        assert!(prompt.contains("Elevated Systolic BP"));
        assert!(prompt.contains("exactly 5"));
        assert!(prompt.contains("\"prevention_steps\""));
    }
}
