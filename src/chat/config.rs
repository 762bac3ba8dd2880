//! Configuration types for the mentor chat application.
//!
//! CLI argument parsing via `arrrg` and the resolved per-session
//! configuration. The API credential is deliberately absent from both: it
//! arrives through the environment or an interactive prompt, never argv.

use arrrg_derive::CommandLine;

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::types::{KnownModel, Model};

/// Default maximum tokens per response.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Command-line arguments for the geminius-mentor tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// Business flow to mentor on.
    #[arrrg(optional, "Business flow: P2P, O2C, or Plan-to-Produce", "FLOW")]
    pub flow: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 4096)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a mentor chat session.
///
/// Holds the resolved values after processing command-line arguments with
/// appropriate defaults. Set once at session start; the session mutates it
/// only through explicit slash commands.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model used for generating responses.
    pub model: Model,

    /// The business flow the mentor teaches this session.
    pub flow: Flow,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional top-p nucleus sampling value.
    pub top_p: Option<f32>,

    /// Optional top-k sampling limit.
    pub top_k: Option<u32>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - Flow: Procure-to-Pay (P2P)
    /// - Max tokens: 4096
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gemini25Flash),
            flow: Flow::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            use_color: true,
            temperature: None,
            top_p: None,
            top_k: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the business flow.
    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the top-p value.
    pub fn with_top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets the top-k value.
    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    /// Resolves arguments to a configuration.
    ///
    /// An unknown model name is accepted as a custom identifier (the API is
    /// the authority on what exists), but an unknown flow name is an error:
    /// the flow parameterizes the prompt and must be one of the three
    /// predefined choices.
    fn try_from(args: ChatArgs) -> Result<Self> {
        let model = args
            .model
            .map(Model::from)
            .unwrap_or(Model::Known(KnownModel::Gemini25Flash));

        let flow = match args.flow {
            Some(name) => name.parse::<Flow>()?,
            None => Flow::default(),
        };

        Ok(ChatConfig {
            model,
            flow,
            max_tokens: args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            use_color: !args.no_color,
            ..ChatConfig::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.flow, Flow::ProcureToPay);
        assert_eq!(config.max_tokens, 4096);
        assert!(config.use_color);
        assert!(config.temperature.is_none());
        assert!(config.top_p.is_none());
        assert!(config.top_k.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::try_from(args).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.flow, Flow::ProcureToPay);
        assert_eq!(config.max_tokens, 4096);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            flow: Some("O2C".to_string()),
            max_tokens: Some(8192),
            no_color: true,
        };
        let config = ChatConfig::try_from(args).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.flow, Flow::OrderToCash);
        assert_eq!(config.max_tokens, 8192);
        assert!(!config.use_color);
    }

    #[test]
    fn config_from_args_rejects_bad_flow() {
        let args = ChatArgs {
            flow: Some("record-to-report".to_string()),
            ..ChatArgs::default()
        };
        let err = ChatConfig::try_from(args).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini20Flash))
            .with_flow(Flow::PlanToProduce)
            .with_max_tokens(2048)
            .without_color()
            .with_temperature(Some(0.6))
            .with_top_p(Some(0.9))
            .with_top_k(Some(64));

        assert_eq!(config.model, Model::Known(KnownModel::Gemini20Flash));
        assert_eq!(config.flow, Flow::PlanToProduce);
        assert_eq!(config.max_tokens, 2048);
        assert!(!config.use_color);
        assert_eq!(config.temperature, Some(0.6));
        assert_eq!(config.top_p, Some(0.9));
        assert_eq!(config.top_k, Some(64));
    }
}
