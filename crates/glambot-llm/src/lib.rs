//! Language-model plumbing: prompt assembly and streaming completions.

pub mod client;
pub mod prompt;

pub use client::{ChatClient, TokenSource, TokenStream};
pub use prompt::{PromptInputs, build_messages};
