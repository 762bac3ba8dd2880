//! Wire types for the Gemini generative-language REST API.
//!
//! One type per file, serde-mapped to the camelCase JSON the service
//! speaks. Only the text-generation surface is modeled.

mod candidate;
mod content;
mod finish_reason;
mod generate_content_request;
mod generate_content_response;
mod generation_config;
mod model;
mod model_info;
mod part;
mod usage_metadata;

pub use candidate::Candidate;
pub use content::{Content, Role};
pub use finish_reason::FinishReason;
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::GenerateContentResponse;
pub use generation_config::GenerationConfig;
pub use model::{KnownModel, Model};
pub use model_info::ModelInfo;
pub use part::Part;
pub use usage_metadata::UsageMetadata;
