//! Quote refresh module.
//!
//! Provides the refresh coordinator and its persistence boundary:
//!
//! - [`store`] - Storage trait for persisting and querying quote data
//! - [`refresh`] - Per-cycle refresh report and outcome classification
//! - [`service`] - Chunked refresh coordinator
//!
//! # Architecture
//!
//! ```text
//! QuoteService → MarketDataProvider (market-data crate)
//!      ↓
//! QuoteStore
//! ```
//!
//! The coordinator only sees trait objects. Storage backends and providers
//! are swapped at construction time, which keeps the refresh rules testable
//! against in-memory doubles.

pub mod refresh;
pub mod service;
pub mod store;

// Re-export commonly used types for convenience
pub use refresh::{RefreshFailure, RefreshOutcome, RefreshReport};
pub use service::QuoteService;
pub use store::{InMemoryQuoteStore, QuoteStore};
