//! # GlamBot Query Understanding
//!
//! The pipeline that turns a raw user message into something the retrieval
//! layer can work with:
//!
//! ```text
//! raw message
//!   → sanitize (strip markup, cap length)
//!   → detect language (English vs Roman Urdu)
//!   → normalize (fold misspellings and variants)
//!   → classify intent (price, location, timing, ...)
//!   → expand (append synonyms + conversation context)
//! ```
//!
//! Everything here is a pure function over precompiled pattern tables, so the
//! word lists can be unit-tested in isolation from the transport code.

pub mod expand;
pub mod intent;
pub mod language;
pub mod normalize;
pub mod sanitize;

pub use expand::expand;
pub use intent::{Intent, classify};
pub use language::{detect, from_history};
pub use normalize::normalize;
pub use sanitize::sanitize;
