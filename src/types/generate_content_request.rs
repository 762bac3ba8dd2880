use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig};

/// Request body for `generateContent` and `streamGenerateContent`.
///
/// The conversation travels entirely in `contents`: the assembled mentor
/// instructions occupy the first entry, followed by the session turns in
/// chronological order. Nothing is ever reordered or dropped from that list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Ordered conversation history, newest entry last.
    pub contents: Vec<Content>,

    /// Sampling parameters, omitted when all defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request from a full conversation history.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            generation_config: None,
        }
    }

    /// Attaches sampling parameters; an all-default config is dropped.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = (!config.is_empty()).then_some(config);
        self
    }
}
