//! Core logic of the conversation client: transcript ownership, the
//! request/reply exchange, and its single-flight state machine.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod client;
pub mod conversation;
mod model_client;

pub use client::{
    ChatClient, ChatClientBuilder, ChatStage, NO_RESPONSE, SubmitError,
};
