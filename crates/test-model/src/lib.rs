//! A local fake model for testing purpose.

mod preset;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use little_chat_model::{
    Credential, ErrorKind, ModelChoice, ModelFinishReason, ModelMessage,
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
    ModelUsage, Role,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A request as it was received by [`TestModelProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub credential: Credential,
    pub request: ModelRequest,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The response is selected
/// by the number of user messages in the request, so the first user turn
/// gets the first preset, the second user turn gets the second one, and so
/// on. If there are no enough presets in the script, an error will be
/// returned.
///
/// Every request is recorded and can be inspected with
/// [`TestModelProvider::requests`]. Clones share the same record.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Vec<PresetResponse>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.script.push(preset);
    }

    /// Delays every response by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn respond(&self, req: &ModelRequest) -> Result<ModelResponse, Error> {
        let user_turns = req
            .messages
            .iter()
            .filter(|msg| msg.role() == Role::User)
            .count();
        let Some(preset) = user_turns
            .checked_sub(1)
            .and_then(|step| self.script.get(step))
        else {
            return Err(Error {
                message: "no enough steps".to_owned(),
                kind: ErrorKind::Status,
            });
        };

        let choices = match preset {
            PresetResponse::Reply(text) => vec![ModelChoice {
                index: 0,
                message: ModelMessage::assistant(text.clone()),
                finish_reason: ModelFinishReason::Stop,
            }],
            PresetResponse::NoChoices => vec![],
            PresetResponse::Failure(kind) => {
                return Err(Error {
                    message: format!("scripted failure: {kind:?}"),
                    kind: *kind,
                });
            }
        };

        let prompt_tokens = req.messages.len() as u32;
        let completion_tokens = choices.len() as u32;
        Ok(ModelResponse {
            id: Some(format!("test:{user_turns}")),
            object: "chat.completion".to_owned(),
            created: 0,
            model: req.model.clone(),
            choices,
            usage: ModelUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        })
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        credential: &Credential,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                credential: credential.clone(),
                request: req.clone(),
            });

        let result = self.respond(req);
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            result
        }
    }
}
