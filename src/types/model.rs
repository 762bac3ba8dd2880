use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or tuned models)
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 2.5 Flash
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,

    /// Gemini 2.5 Pro
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,

    /// Gemini 2.5 Flash-Lite
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,

    /// Gemini 1.5 Pro
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,

    /// Gemini 1.5 Flash
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
}

impl Model {
    /// Returns the model identifier as used in request paths, without the
    /// `models/` prefix.
    pub fn as_api_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::Gemini25Flash => write!(f, "gemini-2.5-flash"),
            KnownModel::Gemini25Pro => write!(f, "gemini-2.5-pro"),
            KnownModel::Gemini25FlashLite => write!(f, "gemini-2.5-flash-lite"),
            KnownModel::Gemini20Flash => write!(f, "gemini-2.0-flash"),
            KnownModel::Gemini15Pro => write!(f, "gemini-1.5-pro"),
            KnownModel::Gemini15Flash => write!(f, "gemini-1.5-flash"),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A `models/` prefix is accepted since the API reports names that way.
        let name = s.strip_prefix("models/").unwrap_or(s);
        let model = match name {
            "gemini-2.5-flash" => Model::Known(KnownModel::Gemini25Flash),
            "gemini-2.5-pro" => Model::Known(KnownModel::Gemini25Pro),
            "gemini-2.5-flash-lite" => Model::Known(KnownModel::Gemini25FlashLite),
            "gemini-2.0-flash" => Model::Known(KnownModel::Gemini20Flash),
            "gemini-1.5-pro" => Model::Known(KnownModel::Gemini15Pro),
            "gemini-1.5-flash" => Model::Known(KnownModel::Gemini15Flash),
            other => Model::Custom(other.to_string()),
        };
        Ok(model)
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        model.parse().unwrap_or(Model::Custom(model))
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        model.parse().unwrap_or_else(|_| Model::Custom(model.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_serialization() {
        let model = Model::Known(KnownModel::Gemini25Flash);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-2.5-flash""#);

        let model = Model::Known(KnownModel::Gemini15Pro);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-1.5-pro""#);
    }

    #[test]
    fn custom_model_serialization() {
        let model = Model::Custom("tunedModels/scm-mentor-v2".to_string());
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""tunedModels/scm-mentor-v2""#);
    }

    #[test]
    fn parse_known_and_custom() {
        let model: Model = "gemini-2.5-flash".parse().unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini25Flash));

        let model: Model = "models/gemini-2.0-flash".parse().unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini20Flash));

        let model: Model = "gemini-experimental".parse().unwrap();
        assert_eq!(model, Model::Custom("gemini-experimental".to_string()));
    }

    #[test]
    fn display_round_trip() {
        for known in [
            KnownModel::Gemini25Flash,
            KnownModel::Gemini25Pro,
            KnownModel::Gemini25FlashLite,
            KnownModel::Gemini20Flash,
            KnownModel::Gemini15Pro,
            KnownModel::Gemini15Flash,
        ] {
            let model = Model::Known(known);
            let parsed: Model = model.to_string().parse().unwrap();
            assert_eq!(parsed, model);
        }
    }
}
