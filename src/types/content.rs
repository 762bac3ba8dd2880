use serde::{Deserialize, Serialize};

use crate::types::Part;

/// Role type for a content entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Content authored by the end user.
    User,

    /// Content generated by the model.
    Model,
}

/// One entry in a conversation as the API sees it: a role plus an ordered
/// list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    /// The role of the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// The ordered parts making up this entry.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new `Content` with the given role and parts.
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// Create a new user `Content` with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create a new model `Content` with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Concatenates all text parts into one string.
    ///
    /// Returns `None` if the entry carries no text at all.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        let mut any = false;
        for part in &self.parts {
            if let Some(text) = &part.text {
                out.push_str(text);
                any = true;
            }
        }
        any.then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn user_content_serialization() {
        let content = Content::user("What is the first step?");
        assert_eq!(
            to_value(&content).unwrap(),
            json!({
                "role": "user",
                "parts": [{"text": "What is the first step?"}]
            })
        );
    }

    #[test]
    fn model_content_serialization() {
        let content = Content::model("The first step is a requisition.");
        assert_eq!(
            to_value(&content).unwrap(),
            json!({
                "role": "model",
                "parts": [{"text": "The first step is a requisition."}]
            })
        );
    }

    #[test]
    fn text_concatenates_parts() {
        let content = Content::new(
            Role::Model,
            vec![Part::text("Hello, "), Part::text("learner.")],
        );
        assert_eq!(content.text(), Some("Hello, learner.".to_string()));
    }

    #[test]
    fn text_none_when_empty() {
        let content = Content {
            role: Some(Role::Model),
            parts: vec![],
        };
        assert_eq!(content.text(), None);
    }

    #[test]
    fn deserializes_without_role() {
        let content: Content = serde_json::from_value(json!({
            "parts": [{"text": "hi"}]
        }))
        .unwrap();
        assert!(content.role.is_none());
        assert_eq!(content.text(), Some("hi".to_string()));
    }
}
