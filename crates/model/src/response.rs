use serde::{Deserialize, Serialize};

use crate::request::ModelMessage;

/// A complete response from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelResponse {
    /// Identifier assigned by the provider, if any.
    pub id: Option<String>,
    /// The object type reported by the provider.
    pub object: String,
    /// Creation time in seconds since the Unix epoch.
    pub created: i64,
    /// The model that actually served the request.
    pub model: String,
    /// Candidate replies. Callers usually only consume the first one.
    pub choices: Vec<ModelChoice>,
    /// Token accounting for the exchange.
    pub usage: ModelUsage,
}

impl ModelResponse {
    /// Returns the message of the first choice, if there is any.
    #[inline]
    pub fn first_message(&self) -> Option<&ModelMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

/// One candidate reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelChoice {
    /// Position of this choice in the response.
    pub index: u32,
    /// The reply message.
    pub message: ModelMessage,
    /// Why the model stopped generating this choice.
    pub finish_reason: ModelFinishReason,
}

/// The reason why a model response has finished.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The output hit the token limit.
    Length,
    /// The model wants to call a function.
    FunctionCall,
    /// The output was withheld by a content filter.
    ContentFilter,
    /// Any reason this crate doesn't know about.
    Other(String),
}

impl ModelFinishReason {
    /// Maps a wire-level finish reason to a [`ModelFinishReason`].
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" => ModelFinishReason::Stop,
            "length" => ModelFinishReason::Length,
            "function_call" | "tool_calls" => ModelFinishReason::FunctionCall,
            "content_filter" => ModelFinishReason::ContentFilter,
            other => ModelFinishReason::Other(other.to_owned()),
        }
    }
}

/// Token counters reported by the provider.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ModelUsage {
    /// Tokens consumed by the input messages.
    pub prompt_tokens: u32,
    /// Tokens generated for the reply.
    pub completion_tokens: u32,
    /// Sum of the above.
    pub total_tokens: u32,
}
