use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Chat models known to work with the chat completion endpoint.
///
/// Any other identifier can still be used through [`ChatModel::Other`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChatModel {
    /// `gpt-3.5-turbo`
    #[default]
    Gpt35Turbo,
    /// `gpt-4`
    Gpt4,
    /// `gpt-4o`
    Gpt4o,
    /// `gpt-4o-mini`
    Gpt4oMini,
    /// Any other model identifier.
    Other(String),
}

impl ChatModel {
    /// Returns the model identifier sent to the server.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
            ChatModel::Gpt4 => "gpt-4",
            ChatModel::Gpt4o => "gpt-4o",
            ChatModel::Gpt4oMini => "gpt-4o-mini",
            ChatModel::Other(id) => id,
        }
    }
}

impl FromStr for ChatModel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gpt-3.5-turbo" => ChatModel::Gpt35Turbo,
            "gpt-4" => ChatModel::Gpt4,
            "gpt-4o" => ChatModel::Gpt4o,
            "gpt-4o-mini" => ChatModel::Gpt4oMini,
            other => ChatModel::Other(other.to_owned()),
        })
    }
}

impl From<&str> for ChatModel {
    #[inline]
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl AsRef<str> for ChatModel {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for ChatModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_custom() {
        assert_eq!("gpt-4o".parse::<ChatModel>(), Ok(ChatModel::Gpt4o));
        let custom: ChatModel = "llama3:8b".parse().unwrap();
        assert_eq!(custom, ChatModel::Other("llama3:8b".to_owned()));
        assert_eq!(custom.to_string(), "llama3:8b");
        assert_eq!(ChatModel::default().as_str(), "gpt-3.5-turbo");
    }
}
