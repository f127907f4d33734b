//! In-memory chat sessions.
//!
//! One [`SessionStore`] per process holds every conversation: sliding-window
//! history, a hard per-session turn cap, a pinned reply language, and
//! idle-expiry driven by a background sweeper. Production would put this in
//! Redis; a process-local map matches the single-instance deployment.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{SessionSnapshot, SessionStore};
