use little_chat_model::{
    ModelChoice, ModelFinishReason, ModelMessage, ModelRequest, ModelResponse,
    ModelUsage, Role,
};
use serde::{Deserialize, Serialize};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: ModelUsage,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    pub finish_reason: String,
}

// ------------------------
// Types sent to the server
// ------------------------

// Only role and content go over the wire, whatever else the caller keeps
// alongside a message stays local.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: req.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    Message {
        role: msg.role(),
        content: msg.content().to_owned(),
    }
}

pub fn into_model_response(resp: ChatCompletionResponse) -> ModelResponse {
    ModelResponse {
        id: resp.id,
        object: resp.object,
        created: resp.created,
        model: resp.model,
        choices: resp
            .choices
            .into_iter()
            .map(|choice| ModelChoice {
                index: choice.index,
                message: ModelMessage::new(
                    choice.message.role,
                    choice.message.content,
                ),
                finish_reason: ModelFinishReason::from_wire(
                    &choice.finish_reason,
                ),
            })
            .collect(),
        usage: resp.usage,
    }
}
