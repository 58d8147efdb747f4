//! Screening Rule Engine.
//!
//! Derives the lifestyle risk domains from the questionnaire using fixed
//! scoring thresholds. No learned parameters: each domain sums the weights of
//! the sub-indicators that fired and maps the score to a tier with a constant
//! probability. A domain is always reported; when no tier is reached it emits
//! a Low placeholder with a reassuring message.
//!
//! Some domains share one probability between their Moderate and High tiers
//! and Anxiety & Mood has no High tier at all. Both are kept as observed in
//! the screening protocol.

use super::traits::RiskEvaluator;
use crate::models::{ClinicalInput, DiseaseRisk, RiskLevel};

/// A questionnaire item contributing to a domain score.
struct Indicator {
    name: &'static str,
    weight: u8,
    fired: fn(&ClinicalInput) -> bool,
}

/// Minimum score for a level, with its fixed probability.
struct Tier {
    min_score: u8,
    level: RiskLevel,
    probability: f64,
}

/// Emitted when the score stays below every tier.
struct Placeholder {
    probability: f64,
    factor: &'static str,
    step: &'static str,
}

struct ScreeningDomain {
    disease: &'static str,
    indicators: &'static [Indicator],
    /// Highest tier first.
    tiers: &'static [Tier],
    steps: &'static [&'static str],
    placeholder: Placeholder,
}

const DOMAINS: &[ScreeningDomain] = &[
    ScreeningDomain {
        disease: "Digital Eye Strain",
        indicators: &[
            Indicator { name: "Dry/Tired Eyes", weight: 1, fired: |i| i.q4_dry_eyes },
            Indicator { name: "Frequent Headaches", weight: 1, fired: |i| i.q5_headaches },
        ],
        tiers: &[
            Tier { min_score: 2, level: RiskLevel::High, probability: 0.85 },
            Tier { min_score: 1, level: RiskLevel::Moderate, probability: 0.65 },
        ],
        steps: &["Follow 20-20-20 Rule.", "Blink more often."],
        placeholder: Placeholder {
            probability: 0.10,
            factor: "No major symptoms reported",
            step: "Maintain good screen habits.",
        },
    },
    ScreeningDomain {
        disease: "Musculoskeletal Disorder Risk",
        indicators: &[
            Indicator { name: "Neck Stiffness", weight: 1, fired: |i| i.q6_neck_pain },
            Indicator { name: "Lower Back Pain", weight: 1, fired: |i| i.q7_back_pain },
        ],
        tiers: &[
            Tier { min_score: 2, level: RiskLevel::High, probability: 0.75 },
            Tier { min_score: 1, level: RiskLevel::Moderate, probability: 0.75 },
        ],
        steps: &["Ergonomic Audit", "Daily Stretching"],
        placeholder: Placeholder {
            probability: 0.10,
            factor: "Good posture indicators",
            step: "Keep active to prevent future issues.",
        },
    },
    ScreeningDomain {
        disease: "Sleep Deprivation/Disorder",
        indicators: &[
            Indicator { name: "Low Sleep Duration", weight: 1, fired: |i| i.sleep_hours < 7.0 },
            Indicator { name: "Insomnia Symptoms", weight: 2, fired: |i| i.q11_insomnia },
            Indicator { name: "Blue Light Exposure", weight: 1, fired: |i| i.q16_phone_bedtime },
        ],
        tiers: &[
            Tier { min_score: 3, level: RiskLevel::High, probability: 0.80 },
            Tier { min_score: 2, level: RiskLevel::Moderate, probability: 0.80 },
        ],
        steps: &["Digital Sunset (No phones 1h before bed)", "Consistent Wake Time"],
        placeholder: Placeholder {
            probability: 0.15,
            factor: "Good sleep hygiene",
            step: "Maintain 7-8h sleep schedule.",
        },
    },
    ScreeningDomain {
        disease: "High Chronic Stress / Burnout",
        indicators: &[
            Indicator { name: "Feeling Overwhelmed", weight: 1, fired: |i| i.q12_overwhelmed },
            Indicator { name: "Emotional Exhaustion", weight: 1, fired: |i| i.q13_drained },
        ],
        tiers: &[
            Tier { min_score: 2, level: RiskLevel::High, probability: 0.70 },
            Tier { min_score: 1, level: RiskLevel::Moderate, probability: 0.70 },
        ],
        steps: &["Mindfulness Breaks", "Work-Life Boundaries"],
        placeholder: Placeholder {
            probability: 0.10,
            factor: "Balanced emotional state",
            step: "Continue stress management practices.",
        },
    },
    ScreeningDomain {
        disease: "Anxiety & Mood Risk",
        indicators: &[
            Indicator { name: "Nervousness", weight: 1, fired: |i| i.q14_anxious },
            Indicator { name: "Loss of Interest", weight: 1, fired: |i| i.q15_anhedonia },
            Indicator { name: "Digital Dependency", weight: 1, fired: |i| i.q17_internet_anxiety },
        ],
        tiers: &[Tier { min_score: 2, level: RiskLevel::Moderate, probability: 0.60 }],
        steps: &["Digital Detox", "Professional Counseling"],
        placeholder: Placeholder {
            probability: 0.10,
            factor: "Stable mood indicators",
            step: "Practice gratitude/journaling.",
        },
    },
    ScreeningDomain {
        disease: "Sedentary Lifestyle Risk",
        indicators: &[
            Indicator { name: "Prolonged Sitting", weight: 1, fired: |i| i.q8_sedentary },
            Indicator { name: "Low Activity", weight: 1, fired: |i| !i.vigorous_activity },
        ],
        tiers: &[
            Tier { min_score: 2, level: RiskLevel::High, probability: 0.65 },
            Tier { min_score: 1, level: RiskLevel::Moderate, probability: 0.65 },
        ],
        steps: &["Standing Desk", "Hourly Movement Snacks"],
        placeholder: Placeholder {
            probability: 0.20,
            factor: "Active lifestyle",
            step: "Aim for 150min moderate activity/week.",
        },
    },
];

impl ScreeningDomain {
    fn assess(&self, input: &ClinicalInput) -> DiseaseRisk {
        let fired: Vec<&Indicator> = self
            .indicators
            .iter()
            .filter(|indicator| (indicator.fired)(input))
            .collect();
        let score: u8 = fired.iter().map(|indicator| indicator.weight).sum();

        match self.tiers.iter().find(|tier| score >= tier.min_score) {
            Some(tier) => DiseaseRisk::new(
                self.disease,
                tier.level,
                tier.probability,
                fired.iter().map(|indicator| indicator.name.to_string()).collect(),
                self.steps.iter().map(|step| step.to_string()).collect(),
            ),
            None => DiseaseRisk::new(
                self.disease,
                RiskLevel::Low,
                self.placeholder.probability,
                vec![self.placeholder.factor.to_string()],
                vec![self.placeholder.step.to_string()],
            ),
        }
    }
}

/// Deterministic questionnaire scoring across the lifestyle domains.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreeningRuleEngine;

impl ScreeningRuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Names of the domains, in the order they are reported.
    pub fn domains() -> impl Iterator<Item = &'static str> {
        DOMAINS.iter().map(|domain| domain.disease)
    }

    /// One risk per domain, always in the same order.
    pub fn score(&self, input: &ClinicalInput) -> Vec<DiseaseRisk> {
        DOMAINS.iter().map(|domain| domain.assess(input)).collect()
    }
}

impl RiskEvaluator for ScreeningRuleEngine {
    fn evaluate(&self, input: &ClinicalInput) -> Vec<DiseaseRisk> {
        self.score(input)
    }
}
