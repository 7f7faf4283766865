//! Quotecast Core - Refresh, registry, and fan-out services.
//!
//! This crate contains the engine's business logic. It is transport- and
//! storage-agnostic: providers, stores, and the push channel are traits,
//! with in-memory implementations shipped alongside for embedding and
//! testing. The `quotecast-market-data` crate supplies the provider
//! implementations and the quote domain model.

pub mod broadcast;
pub mod constants;
pub mod errors;
pub mod quotes;
pub mod subscriptions;
pub mod symbols;

// Re-export common types from the service modules
pub use broadcast::{BroadcastDispatcher, BroadcastReport, PushChannel};
pub use quotes::{QuoteService, QuoteStore, RefreshOutcome, RefreshReport};
pub use subscriptions::{Subscription, SubscriptionService, SubscriptionStore};
pub use symbols::{SymbolDirectoryService, SymbolStore};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
