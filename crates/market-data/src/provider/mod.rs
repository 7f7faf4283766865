//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Concrete provider implementations (IEX-style HTTP, simulated)
//!
//! Providers are deliberately thin: they expose the symbol universe and the
//! latest quote per symbol. Chunking, partial-failure handling and persistence
//! live in the core crate's refresh coordinator, which keeps providers easy to
//! swap out.

mod traits;

pub mod iex;
pub mod simulated;

// Re-exports
pub use traits::MarketDataProvider;
