use std::pin::Pin;
use std::sync::Arc;

use little_chat_model::{
    Credential, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(Credential, ModelRequest) -> BoxedSendRequestFuture + Send + Sync
>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |credential, req| {
            let fut = provider.send_request(&credential, &req);
            Box::pin(
                async move {
                    trace!(
                        "got a request: model = {}, messages = {}",
                        req.model,
                        req.messages.len()
                    );
                    handle_response::<P>(fut.await)
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the response.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the underlying
    /// provider request.
    #[inline]
    pub async fn send_request(
        &self,
        credential: Credential,
        req: ModelRequest,
    ) -> SendRequestResult {
        (self.handler_fn)(credential, req).await
    }
}

fn handle_response<P: ModelProvider + 'static>(
    resp_or_err: Result<ModelResponse, P::Error>,
) -> SendRequestResult {
    match resp_or_err {
        Ok(resp) => {
            trace!(
                "finished a request: choices = {}, total tokens = {}",
                resp.choices.len(),
                resp.usage.total_tokens
            );
            Ok(resp)
        }
        Err(err) => {
            error!("got an error: {err:?}");
            Err(Box::new(err))
        }
    }
}
