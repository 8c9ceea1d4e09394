use little_chat_core::conversation::Transcript;
use little_chat_core::{ChatClient, ChatClientBuilder, ChatStage, SubmitError};
use little_chat_model::Credential;
use little_chat_openai_model::images::{ImageRequest, ImageResponse};
use little_chat_openai_model::{
    ChatModel, Error as OpenAIError, OpenAIConfig, OpenAIProvider,
};

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    provider: OpenAIProvider,
    credential: Credential,
    model: ChatModel,
    client_builder: ChatClientBuilder,
}

impl SessionBuilder {
    /// Creates a session builder talking to an OpenAI-compatible service.
    pub fn with_openai<C: Into<Credential>>(
        config: OpenAIConfig,
        credential: C,
    ) -> Self {
        let provider = OpenAIProvider::new(config);
        let client_builder =
            ChatClientBuilder::with_model_provider(provider.clone());
        Self {
            provider,
            credential: credential.into(),
            model: ChatModel::default(),
            client_builder,
        }
    }

    /// Sets the chat model. Defaults to [`ChatModel::Gpt35Turbo`].
    #[inline]
    pub fn with_model(mut self, model: ChatModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the system prompt of the conversation.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.client_builder = self.client_builder.with_system_prompt(prompt);
        self
    }

    /// Removes the user message again when its exchange fails.
    #[inline]
    pub fn rollback_on_failure(mut self, rollback: bool) -> Self {
        self.client_builder = self.client_builder.rollback_on_failure(rollback);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            provider: self.provider,
            credential: self.credential,
            model: self.model,
            chat: self.client_builder.build(),
        }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session bundles the credential, the chosen model and one
/// conversation, so callers only deal with plain text. Cloned sessions
/// share the conversation.
#[derive(Clone)]
pub struct Session {
    provider: OpenAIProvider,
    credential: Credential,
    model: ChatModel,
    chat: ChatClient,
}

impl Session {
    /// Sends a message and waits for the reply.
    ///
    /// See [`ChatClient::submit`].
    pub async fn send_message(&self, message: &str) -> Result<String, SubmitError> {
        self.chat
            .submit(&self.credential, self.model.as_str(), message)
            .await
    }

    /// Generates images from a prompt. The conversation is not involved.
    pub async fn generate_images(
        &self,
        req: &ImageRequest,
    ) -> Result<ImageResponse, OpenAIError> {
        self.provider.generate_images(&self.credential, req).await
    }

    /// Replaces the credential used by later requests.
    #[inline]
    pub fn set_credential<C: Into<Credential>>(&mut self, credential: C) {
        self.credential = credential.into();
    }

    /// Cancels the pending exchange. Returns `false` if there was none.
    #[inline]
    pub fn cancel(&self) -> bool {
        self.chat.cancel()
    }

    /// Starts the conversation over.
    #[inline]
    pub fn reset(&self) {
        self.chat.reset();
    }

    /// Returns the current stage of the conversation.
    #[inline]
    pub fn stage(&self) -> ChatStage {
        self.chat.stage()
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub fn transcript(&self) -> Transcript {
        self.chat.transcript()
    }

    /// Returns the chat model of this session.
    #[inline]
    pub fn model(&self) -> &ChatModel {
        &self.model
    }
}
