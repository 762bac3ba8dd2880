use serde::{Deserialize, Serialize};

/// Metadata for one model, as returned by `models.get`.
///
/// The mentor fetches this once at startup: a successful lookup doubles as
/// credential validation before any chat traffic is sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. "models/gemini-2.5-flash".
    pub name: String,

    /// Human-readable model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Short description of the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Maximum number of input tokens the model accepts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<u64>,

    /// Maximum number of output tokens the model produces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<u64>,

    /// Generation methods the model supports.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub supported_generation_methods: Vec<String>,
}
