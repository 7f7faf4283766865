//! Broadcast fan-out module.
//!
//! Turns one refresh cycle into many personalized pushes:
//!
//! - [`push`] - Connection-addressable delivery trait
//! - [`dispatcher`] - Per-connection projection and concurrent delivery

pub mod dispatcher;
pub mod push;

// Re-export commonly used types for convenience
pub use dispatcher::{BroadcastDispatcher, BroadcastFailure, BroadcastReport};
pub use push::PushChannel;
