use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The configured endpoint is not a valid URL. No request was made.
    InvalidEndpoint,
    /// The request payload could not be serialized. No request was made.
    Encoding,
    /// A network-level failure (connectivity, timeout, reset).
    Transport,
    /// The server answered with a non-success status.
    Status,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The response body does not match the expected shape.
    Decoding,
}

impl ErrorKind {
    /// Returns `true` if sending the same request again later may succeed.
    ///
    /// This is only a hint for callers, nothing in this workspace retries
    /// automatically.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::RateLimitExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(ErrorKind::Transport.is_transient());
        assert!(ErrorKind::RateLimitExceeded.is_transient());
        assert!(!ErrorKind::InvalidEndpoint.is_transient());
        assert!(!ErrorKind::Decoding.is_transient());
        assert!(!ErrorKind::Status.is_transient());
    }

    #[test]
    fn test_wire_names() {
        let names = serde_json::to_value([
            ErrorKind::InvalidEndpoint,
            ErrorKind::RateLimitExceeded,
        ])
        .unwrap();
        assert_eq!(
            names,
            serde_json::json!(["invalid_endpoint", "rate_limit_exceeded"])
        );

        let kind: ErrorKind = serde_json::from_str("\"decoding\"").unwrap();
        assert_eq!(kind, ErrorKind::Decoding);
    }
}
