use little_chat_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// How the fake model answers one exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetResponse {
    /// A well-formed response with one choice carrying this text.
    #[serde(rename = "reply")]
    Reply(String),
    /// A well-formed response without any choice.
    #[serde(rename = "no_choices")]
    NoChoices,
    /// The exchange fails with an error of this kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

impl PresetResponse {
    /// Creates a reply preset.
    #[inline]
    pub fn reply<S: Into<String>>(text: S) -> Self {
        Self::Reply(text.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_load_script_from_json() {
        let script: Vec<PresetResponse> = serde_json::from_value(json!([
            { "type": "reply", "data": "Hello!" },
            { "type": "no_choices" },
            { "type": "failure", "data": "transport" },
            { "type": "failure", "data": "rate_limit_exceeded" }
        ]))
        .unwrap();

        assert_eq!(
            script,
            [
                PresetResponse::reply("Hello!"),
                PresetResponse::NoChoices,
                PresetResponse::Failure(ErrorKind::Transport),
                PresetResponse::Failure(ErrorKind::RateLimitExceeded),
            ]
        );
    }
}
