use std::fmt::{self, Debug, Formatter};

/// An opaque credential used to authorize requests to a model provider.
///
/// The value is never validated, it is wrapped into the authorization
/// material as is. `Debug` output never reveals the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Creates a credential from the given secret.
    #[inline]
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self(secret.into())
    }

    /// Returns the raw secret.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the value of a bearer-style `Authorization` header.
    #[inline]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<&str> for Credential {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}
