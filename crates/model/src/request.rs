use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system instructions.
    System,
    /// A user input.
    User,
    /// A reply from the model.
    Assistant,
    /// A function result.
    Function,
}

impl Role {
    /// Returns the wire name of this role.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
        }
    }
}

/// A complete message.
///
/// Messages are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelMessage {
    role: Role,
    content: String,
}

impl ModelMessage {
    /// Creates a message with the given role and content.
    #[inline]
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Returns the role of the message author.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text content.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The model identifier, passed to the provider as is.
    pub model: String,
    /// The input messages, in conversational order.
    pub messages: Vec<ModelMessage>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_role_wire_names() {
        for role in [Role::System, Role::User, Role::Assistant, Role::Function]
        {
            assert_eq!(serde_json::to_value(role).unwrap(), json!(role.as_str()));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<ModelMessage>(json!({
            "role": "tool",
            "content": "x"
        }));
        assert!(result.is_err());
    }
}
