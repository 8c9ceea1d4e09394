use reqwest::Url;

use little_chat_model::ErrorKind;

use crate::Error;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Builder for [`OpenAIConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OpenAIConfigBuilder {
    base_url: Option<String>,
}

impl OpenAIConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL, e.g. `https://api.openai.com/v1`.
    ///
    /// The URL is not validated here. An unparsable URL makes every
    /// request fail with [`ErrorKind::InvalidEndpoint`].
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> OpenAIConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        OpenAIConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

/// Configuration for the OpenAI-compatible provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpenAIConfig {
    pub(crate) base_url: String,
}

impl OpenAIConfig {
    /// Returns the base URL without a trailing slash.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub(crate) fn chat_completions_url(&self) -> Result<Url, Error> {
        self.endpoint("/chat/completions")
    }

    #[inline]
    pub(crate) fn image_generations_url(&self) -> Result<Url, Error> {
        self.endpoint("/images/generations")
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|err| {
            Error::new(
                format!("invalid endpoint `{raw}`: {err}"),
                ErrorKind::InvalidEndpoint,
            )
        })
    }
}

impl Default for OpenAIConfig {
    #[inline]
    fn default() -> Self {
        OpenAIConfigBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = OpenAIConfig::default();
        assert_eq!(
            config.chat_completions_url().unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            config.image_generations_url().unwrap().as_str(),
            "https://api.openai.com/v1/images/generations"
        );
    }

    #[test]
    fn test_trailing_slash() {
        let config = OpenAIConfigBuilder::new()
            .with_base_url("http://localhost:8080/v1/")
            .build();
        assert_eq!(config.base_url(), "http://localhost:8080/v1");
        assert_eq!(
            config.chat_completions_url().unwrap().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = OpenAIConfigBuilder::new()
            .with_base_url("not a url")
            .build();
        let err = config.chat_completions_url().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEndpoint);
    }
}
