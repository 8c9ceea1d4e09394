//! A model provider for OpenAI-compatible APIs.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
pub mod images;
mod models;
mod proto;

use std::sync::Arc;

use little_chat_model::{
    Credential, ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse,
};
use mime::Mime;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use images::{ImageRequest, ImageResponse};
pub use models::ChatModel;
use proto::ChatCompletionResponse;

/// Error type for [`OpenAIProvider`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    kind: ErrorKind,
    status: Option<StatusCode>,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            status: None,
        }
    }

    fn from_status(status: StatusCode) -> Self {
        let kind = if status == StatusCode::TOO_MANY_REQUESTS {
            ErrorKind::RateLimitExceeded
        } else {
            ErrorKind::Status
        };
        Self {
            message: format!("unexpected status: {status}"),
            kind,
            status: Some(status),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status if the server answered at all.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
///
/// Besides implementing [`ModelProvider`] for chat completions, the
/// provider also exposes the image generation endpoint through
/// [`OpenAIProvider::generate_images`].
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Generates images from a text prompt.
    pub fn generate_images(
        &self,
        credential: &Credential,
        req: &ImageRequest,
    ) -> impl Future<Output = Result<ImageResponse, Error>> + Send + 'static + use<>
    {
        debug!("generating {} image(s) of {}", req.n, req.size.as_str());
        self.post_json(self.config.image_generations_url(), credential, req)
    }

    /// Sends one JSON request and decodes the JSON response.
    ///
    /// The request is fully prepared before the returned future is polled,
    /// so endpoint and encoding errors never cause any I/O.
    fn post_json<B, T>(
        &self,
        url: Result<Url, Error>,
        credential: &Credential,
        body: &B,
    ) -> impl Future<Output = Result<T, Error>> + Send + 'static + use<B, T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let prepared = url.and_then(|url| self.prepare(url, credential, body));

        async move {
            let resp = prepared?.send().await.map_err(|err| {
                error!("request failed: {err}");
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;

            let status = resp.status();
            if !status.is_success() {
                warn!("server responded with {status}");
                return Err(Error::from_status(status));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<Mime>().ok());
            let is_json = content_type
                .as_ref()
                .map(|m| {
                    m.subtype() == mime::JSON
                        || m.suffix() == Some(mime::JSON)
                })
                .unwrap_or(false);
            if !is_json {
                // Decoding is still attempted, some compatible servers
                // send JSON as `text/plain`.
                warn!("unexpected content type: {content_type:?}");
            }

            let bytes = resp.bytes().await.map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;
            trace!("got response body: {} bytes", bytes.len());
            serde_json::from_slice::<T>(&bytes).map_err(|err| {
                error!("failed to decode response: {err}");
                Error::new(
                    format!("failed to decode response: {err}"),
                    ErrorKind::Decoding,
                )
            })
        }
    }

    fn prepare<B: Serialize + ?Sized>(
        &self,
        url: Url,
        credential: &Credential,
        body: &B,
    ) -> Result<RequestBuilder, Error> {
        let body = serde_json::to_vec(body).map_err(|err| {
            Error::new(
                format!("failed to encode request: {err}"),
                ErrorKind::Encoding,
            )
        })?;
        trace!("prepared request to {url}: {} bytes", body.len());
        Ok(self
            .client
            .post(url)
            .header(header::AUTHORIZATION, credential.bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body))
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        credential: &Credential,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        debug!(
            "sending chat completion: model = {}, messages = {}",
            req.model,
            req.messages.len()
        );
        let openai_req = proto::create_request(req);
        let resp_fut = self.post_json::<_, ChatCompletionResponse>(
            self.config.chat_completions_url(),
            credential,
            &openai_req,
        );

        async move {
            let resp = resp_fut.await?;
            Ok(proto::into_model_response(resp))
        }
    }
}
