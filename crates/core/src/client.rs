mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex};

use little_chat_model::{
    Credential, ErrorKind, ModelMessage, ModelProviderError, ModelRequest,
};
use tokio::select;

use crate::conversation::Transcript;
use crate::model_client::ModelClient;
pub use builder::ChatClientBuilder;
use state::{ClientState, ExchangeGuard, lock};

/// The reply text used when the model answers without any choice.
pub const NO_RESPONSE: &str = "No response";

/// The stage of a [`ChatClient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatStage {
    /// Ready to accept a submission.
    Idle,
    /// An exchange is in flight.
    AwaitingReply,
}

/// The error type for [`ChatClient::submit`].
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Another submission is still awaiting its reply. The transcript was
    /// not touched.
    #[error("a reply is already pending")]
    Busy,
    /// The exchange was cancelled before the reply arrived.
    #[error("the exchange was cancelled")]
    Cancelled,
    /// The model provider failed.
    #[error("{0}")]
    Model(Box<dyn ModelProviderError>),
}

impl SubmitError {
    /// Returns the kind of the provider error, if this is one.
    #[inline]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            SubmitError::Model(err) => Some(err.kind()),
            SubmitError::Busy | SubmitError::Cancelled => None,
        }
    }
}

/// A conversation with a completion service.
///
/// The client owns the transcript and mediates one exchange at a time: a
/// submission appends the user message, sends the whole transcript to the
/// model and appends the reply once it arrives. Submitting while a reply is
/// pending fails with [`SubmitError::Busy`].
///
/// Cloning the client yields another handle to the same conversation.
#[derive(Clone)]
pub struct ChatClient {
    model_client: ModelClient,
    state: Arc<Mutex<ClientState>>,
    rollback_on_failure: bool,
}

impl ChatClient {
    /// Sends `text` as the next user message and waits for the reply.
    ///
    /// On success the reply is appended to the transcript and returned. If
    /// the model returns no choice at all, [`NO_RESPONSE`] stands in for
    /// the reply.
    ///
    /// On failure the user message stays in the transcript, unless the
    /// client was built with
    /// [`rollback_on_failure`](ChatClientBuilder::rollback_on_failure).
    /// An [`ErrorKind::InvalidEndpoint`] failure always removes it again.
    ///
    /// # Cancel safety
    ///
    /// Dropping the returned future cancels the exchange, just like
    /// [`ChatClient::cancel`].
    pub async fn submit(
        &self,
        credential: &Credential,
        model: &str,
        text: &str,
    ) -> Result<String, SubmitError> {
        let (id, cancel_rx, request) = {
            let mut state = lock(&self.state);
            let Some((id, cancel_rx)) = state.begin_exchange() else {
                debug!("rejecting submission, a reply is already pending");
                return Err(SubmitError::Busy);
            };
            state.transcript.push(ModelMessage::user(text));
            let request = ModelRequest {
                model: model.to_owned(),
                messages: state.transcript.items.clone(),
            };
            (id, cancel_rx, request)
        };
        debug!(
            "exchange {id} started: model = {model}, messages = {}",
            request.messages.len()
        );

        let mut guard = ExchangeGuard {
            state: &self.state,
            id,
            rollback: self.rollback_on_failure,
            armed: true,
        };
        let resp_fut = self.model_client.send_request(credential.clone(), request);
        let resp_or_err = select! {
            biased;

            _ = cancel_rx => {
                // `cancel` or `reset` has already cleaned up the state.
                guard.disarm();
                debug!("exchange {id} cancelled");
                return Err(SubmitError::Cancelled);
            }
            resp_or_err = resp_fut => resp_or_err,
        };
        guard.disarm();

        let mut state = lock(&self.state);
        if !state.finish_exchange(id) {
            // Cancelled after the response arrived but before we got here.
            debug!("exchange {id} cancelled, discarding its outcome");
            return Err(SubmitError::Cancelled);
        }

        match resp_or_err {
            Ok(resp) => {
                let reply = resp
                    .first_message()
                    .map(|msg| msg.content().to_owned())
                    .unwrap_or_else(|| {
                        warn!("exchange {id} got no choices");
                        NO_RESPONSE.to_owned()
                    });
                state.transcript.push(ModelMessage::assistant(reply.clone()));
                debug!("exchange {id} finished");
                Ok(reply)
            }
            Err(err) => {
                // No request was attempted, so the message never reached
                // the model.
                if self.rollback_on_failure
                    || err.kind() == ErrorKind::InvalidEndpoint
                {
                    state.transcript.pop_last();
                }
                debug!("exchange {id} failed: {err}");
                Err(SubmitError::Model(err))
            }
        }
    }

    /// Cancels the pending exchange, if any.
    ///
    /// The pending [`submit`](ChatClient::submit) call resolves to
    /// [`SubmitError::Cancelled`] and the client is idle again. Returns
    /// `false` if there was nothing to cancel.
    pub fn cancel(&self) -> bool {
        lock(&self.state).cancel_pending(self.rollback_on_failure)
    }

    /// Clears the transcript, cancelling the pending exchange if any.
    ///
    /// The system prompt, if configured, is kept as the first message.
    pub fn reset(&self) {
        debug!("resetting conversation");
        lock(&self.state).reset();
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> ChatStage {
        lock(&self.state).stage()
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub fn transcript(&self) -> Transcript {
        lock(&self.state).transcript.clone()
    }
}

impl ChatClient {
    fn from_builder(builder: ChatClientBuilder) -> Self {
        let ChatClientBuilder {
            model_client,
            system_prompt,
            rollback_on_failure,
        } = builder;

        Self {
            model_client,
            state: Arc::new(Mutex::new(ClientState::new(system_prompt))),
            rollback_on_failure,
        }
    }
}
