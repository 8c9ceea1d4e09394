//! An abstraction layer for chat completion services.
//!
//! This crate establishes a unified protocol for the conversation client
//! to talk to a completion service, so that the client can switch between
//! providers (a real HTTP endpoint, or a scripted fake in tests) without
//! modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod credential;
mod error;
mod provider;
mod request;
mod response;

pub use credential::*;
pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
