//! An out-of-the-box chat session on top of an OpenAI-compatible service.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library (or through its C ABI) to bring the conversation
//! client into your own host apps.

#![deny(missing_docs)]

#[cfg(feature = "ffi")]
pub mod ffi;
pub mod notes;
mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}

/// Re-exports of [`little_chat_openai_model`] crate.
pub mod openai {
    pub use little_chat_openai_model::*;
}
