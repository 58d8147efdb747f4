use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Fixed disclaimer attached to every assessment.
pub const DISCLAIMER: &str = "ESTIMATE ONLY. NOT A DIAGNOSIS. Consult a physician.";

/// Severity label attached to a risk. Ordered by severity for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Maps a probability to a level: `> 0.7` is High, `> 0.4` is Moderate, anything else Low.
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            RiskLevel::High
        } else if probability > 0.4 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NHANES gender coding (`RIAGENDR`), serialized as the integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gender {
    Male = 1,
    Female = 2,
}

impl Gender {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Gender {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            other => Err(format!("invalid gender code {} (expected 1 or 2)", other)),
        }
    }
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> Self {
        gender.code()
    }
}

fn default_digital_hours() -> f64 {
    8.0
}

/// Questionnaire answers and clinical measurements for one assessment.
///
/// Q9 of the screening questionnaire is `vigorous_activity` and Q10 is
/// `sleep_hours`; the remaining items are the `qN_*` booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClinicalInput {
    /// Age in years (NHANES: RIDAGEYR).
    #[validate(range(min = 18, max = 120))]
    pub age: u32,
    /// 1 = male, 2 = female (NHANES: RIAGENDR).
    pub gender: Gender,

    /// Body Mass Index (NHANES: BMXBMI).
    #[validate(range(min = 10.0, max = 100.0))]
    pub bmi: f64,
    /// Systolic blood pressure in mmHg (NHANES: BPXSY1).
    #[validate(range(min = 60, max = 250))]
    pub systolic_bp: u32,
    /// Glycohemoglobin % (NHANES: LBXGH).
    #[validate(range(min = 3.0, max = 20.0))]
    pub hba1c: f64,
    /// Total cholesterol in mg/dL (NHANES: LBXTC).
    #[validate(range(min = 50, max = 500))]
    pub cholesterol: u32,

    /// Hours of sleep per night (Q10).
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: f64,
    /// Exercises vigorously at least three times a week (Q9).
    pub vigorous_activity: bool,
    pub smoker_history: bool,

    pub q1_bp_history: bool,
    pub q2_diabetes_history: bool,
    pub q3_family_heart: bool,
    pub q4_dry_eyes: bool,
    pub q5_headaches: bool,
    pub q6_neck_pain: bool,
    pub q7_back_pain: bool,
    /// Sits more than six hours a day.
    pub q8_sedentary: bool,
    pub q11_insomnia: bool,
    pub q12_overwhelmed: bool,
    pub q13_drained: bool,
    pub q14_anxious: bool,
    pub q15_anhedonia: bool,
    pub q16_phone_bedtime: bool,
    pub q17_internet_anxiety: bool,
    pub q18_breathlessness: bool,
    pub q19_fatigue: bool,
    /// Processed food more than four times a week.
    pub q20_diet: bool,

    /// Legacy estimate of daily device usage, kept for profile context.
    #[serde(default = "default_digital_hours")]
    pub daily_digital_hours: f64,
}

/// A single assessed risk, either classifier-backed or rule-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRisk {
    /// Unique within one assessment; used as the key when merging explanations.
    pub disease: String,
    pub risk_level: RiskLevel,
    pub probability: f64,
    pub contributing_factors: Vec<String>,
    pub prevention_steps: Vec<String>,
}

impl DiseaseRisk {
    pub fn new(
        disease: impl Into<String>,
        risk_level: RiskLevel,
        probability: f64,
        contributing_factors: Vec<String>,
        prevention_steps: Vec<String>,
    ) -> Self {
        Self {
            disease: disease.into(),
            risk_level,
            probability,
            contributing_factors,
            prevention_steps,
        }
    }

    /// Returns the same risk with its prevention steps replaced.
    pub fn with_prevention_steps(self, prevention_steps: Vec<String>) -> Self {
        Self {
            prevention_steps,
            ..self
        }
    }
}

/// The finalized result of one assessment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub assessment_id: String,
    pub timestamp: DateTime<Utc>,
    pub risks: Vec<DiseaseRisk>,
    pub disclaimer: String,
}

impl AssessmentResponse {
    /// Wraps a final risk list with a fresh identifier and capture time.
    pub fn new(risks: Vec<DiseaseRisk>) -> Self {
        Self {
            assessment_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            risks,
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A healthy baseline profile: no screening item fires.
    pub fn baseline_input() -> ClinicalInput {
        ClinicalInput {
            age: 45,
            gender: Gender::Male,
            bmi: 24.0,
            systolic_bp: 118,
            hba1c: 5.2,
            cholesterol: 180,
            sleep_hours: 8.0,
            vigorous_activity: true,
            smoker_history: false,
            q1_bp_history: false,
            q2_diabetes_history: false,
            q3_family_heart: false,
            q4_dry_eyes: false,
            q5_headaches: false,
            q6_neck_pain: false,
            q7_back_pain: false,
            q8_sedentary: false,
            q11_insomnia: false,
            q12_overwhelmed: false,
            q13_drained: false,
            q14_anxious: false,
            q15_anhedonia: false,
            q16_phone_bedtime: false,
            q17_internet_anxiety: false,
            q18_breathlessness: false,
            q19_fatigue: false,
            q20_diet: false,
            daily_digital_hours: 8.0,
        }
    }
}
