use little_chat_model::ModelProvider;

use super::ChatClient;
use crate::model_client::ModelClient;

/// [`ChatClient`] builder.
pub struct ChatClientBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) system_prompt: Option<String>,
    pub(crate) rollback_on_failure: bool,
}

impl ChatClientBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            system_prompt: None,
            rollback_on_failure: false,
        }
    }

    /// Sets a system prompt.
    ///
    /// The prompt is the first message of the transcript, and is put back
    /// whenever the client is reset.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Controls what happens to the user message of a failed exchange.
    ///
    /// By default (`false`) the message stays in the transcript and is sent
    /// again with the next submission. With `true`, a failed or cancelled
    /// exchange leaves the transcript as it was before the submission.
    #[inline]
    pub fn rollback_on_failure(mut self, rollback: bool) -> Self {
        self.rollback_on_failure = rollback;
        self
    }

    /// Builds the client.
    #[inline]
    pub fn build(self) -> ChatClient {
        ChatClient::from_builder(self)
    }
}
