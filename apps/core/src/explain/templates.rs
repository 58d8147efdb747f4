//! Curated prevention guidance used whenever generated advice is unavailable.

use crate::assessment::{HYPERTENSION, TYPE_2_DIABETES};
use crate::models::DiseaseRisk;

const DIABETES_STEPS: [&str; 5] = [
    "**Initiate 'Walking Prescriptions'**: Walk for 15 minutes immediately after lunch and dinner. *Why*: Muscle activity burns glucose without insulin. *Result*: Lower post-meal blood sugar.",
    "**Optimize Carbohydrate Timing**: Eat carbs only *after* vegetables and protein in your meal. *Why*: Fiber blunts the sugar spike. *Result*: Stable energy levels.",
    "**Strength Training Micro-Dosing**: Do 20 squats or push-ups before showering. *Why*: Increases insulin sensitivity in muscles. *Result*: Better long-term glucose control.",
    "**Sleep Hygiene Audit**: Extend sleep to 7.5 hours minimum. *Why*: Sleep deprivation causes insulin resistance. *Result*: Lower morning fasting glucose.",
    "**Swap Sugary Drinks**: Replace soda/juice with water or tea. *Why*: Liquid sugar spikes insulin rapidly. *Result*: Immediate caloric reduction and metabolic relief.",
];

const HYPERTENSION_STEPS: [&str; 5] = [
    "**Sodium Pattern Interrupt**: Stop adding salt at the table entirely. *Why*: Excess sodium retains water, raising pressure. *Result*: potential 5-10 point systolic drop.",
    "**Box Breathing Protocol**: Practice 4-4-4-4 breathing for 2 minutes when stressed. *Why*: Activates parasympathetic nervous system. *Result*: Immediate acute BP reduction.",
    "**Increase Potassium Intake**: Eat one banana or avocado daily. *Why*: Potassium helps kidneys excrete sodium. *Result*: Balanced electrolyte levels.",
    "**Aerobic Consistency**: Walk briskly for 30 minutes, 5 days/week. *Why*: Strengthens the heart muscle. *Result*: Lower resting heart rate and pressure.",
    "**Limit Alcohol**: Cap intake to 1 drink/day maximum. *Why*: Alcohol is a direct vasoconstrictor. *Result*: Prevention of evening BP spikes.",
];

const GENERIC_STEPS: [&str; 5] = [
    "**Consult a Specialist**: Schedule a targeted review for this specific condition. *Why*: Clinical evaluation is required for diagnosis. *Result*: Accurate treatment plan.",
    "**Track Symptoms Daily**: Log occurrences of symptoms in a journal. *Why*: Identifying triggers helps management. *Result*: Better data for your doctor.",
    "**Prioritize Sleep**: Aim for 7-8 hours of quality rest. *Why*: Recovery happens during sleep. *Result*: Improved systemic resilience.",
    "**Hydration Strategy**: Drink 2.5L of water daily. *Why*: Dehydration exacerbates most chronic stress. *Result*: Better cellular function.",
    "**Stress Reduction**: Practice 10 mins of mindfulness. *Why*: Cortisol management improves most conditions. *Result*: Mental clarity.",
];

/// The curated five-step list for a disease name.
pub fn template_steps(disease: &str) -> &'static [&'static str; 5] {
    match disease {
        TYPE_2_DIABETES => &DIABETES_STEPS,
        HYPERTENSION => &HYPERTENSION_STEPS,
        _ => &GENERIC_STEPS,
    }
}

/// Replaces prevention steps with the curated templates.
///
/// Risks without contributing factors keep their existing steps.
pub fn template_fallback(risks: Vec<DiseaseRisk>) -> Vec<DiseaseRisk> {
    risks
        .into_iter()
        .map(|risk| {
            if risk.contributing_factors.is_empty() {
                return risk;
            }
            let steps = template_steps(&risk.disease)
                .iter()
                .map(|step| step.to_string())
                .collect();
            risk.with_prevention_steps(steps)
        })
        .collect()
}
