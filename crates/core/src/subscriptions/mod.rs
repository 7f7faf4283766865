//! Subscription registry module.
//!
//! Tracks which symbols each connection wants pushed to it:
//!
//! - [`model`] - The per-connection subscription record
//! - [`store`] - Storage trait plus the in-memory backend
//! - [`service`] - Registry rules (set union, empty-set deletion)

pub mod model;
pub mod service;
pub mod store;

// Re-export commonly used types for convenience
pub use model::Subscription;
pub use service::SubscriptionService;
pub use store::{InMemorySubscriptionStore, SubscriptionStore};
