//! # Assessment Module
//!
//! Numeric risk estimation from a validated questionnaire.
//!
//! ## Components
//! - `features`: fixed-order feature encoding
//! - `classifier`: scaler and the diabetes / hypertension classifiers
//! - `screening`: deterministic lifestyle screening rules
//! - `aggregator`: merge and rank
//! - `engine`: the assembled pipeline

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod features;
pub mod screening;
pub mod traits;

pub use aggregator::aggregate;
pub use classifier::{ClassifierAdapter, ClassifierProbabilities, HYPERTENSION, TYPE_2_DIABETES};
pub use engine::RiskEngine;
pub use features::{encode, FeatureVector};
pub use screening::ScreeningRuleEngine;
pub use traits::RiskEvaluator;
