//! # GlamBot Core
//!
//! Shared foundation for the GlamBot salon chat service: configuration,
//! the error taxonomy, and the types that cross crate boundaries
//! (messages, languages, retrieved evidence, and the streamed protocol
//! events seen by clients).

pub mod config;
pub mod error;
pub mod types;

pub use config::GlamBotConfig;
pub use error::{GlamBotError, Result};
