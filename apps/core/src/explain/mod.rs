//! # Explain Module
//!
//! Natural-language prevention guidance layered on top of the numeric risks.
//!
//! ## Components
//! - `traits`: `ExplanationBackend` seam for text generation
//! - `client`: OpenAI-compatible chat completions client
//! - `prompt`: prompt construction
//! - `repair`: code-fence stripping and truncated-JSON repair
//! - `templates`: curated fallback guidance
//! - `enricher`: orchestrates generation, parsing and fallback

pub mod client;
pub mod enricher;
pub mod prompt;
pub mod repair;
pub mod templates;
pub mod traits;

pub use client::ChatCompletionClient;
pub use enricher::{merge_advice, parse_advice, AdviceMap, ExplanationEnricher};
pub use repair::repair_json;
pub use templates::template_fallback;
pub use traits::{CompletionRequest, ExplanationBackend};
