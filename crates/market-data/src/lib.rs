//! Quotecast Market Data Crate
//!
//! This crate fetches quote and symbol reference data from an upstream
//! market data source.
//!
//! # Overview
//!
//! The market data crate provides:
//! - OHLCV quote and symbol directory models
//! - The `MarketDataProvider` trait the refresh engine is written against
//! - An IEX-style HTTP provider and a simulated random-walk provider
//!
//! # Core Types
//!
//! - [`Quote`] - OHLCV snapshot for one symbol at a point in time
//! - [`SymbolInfo`] - one row of the provider's symbol directory
//! - [`Interval`] - refresh cadence label carried on subscriptions
//! - [`MarketDataError`] - provider error taxonomy

pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{Interval, Quote, SymbolInfo};

// Re-export provider types
pub use errors::MarketDataError;
pub use provider::iex::IexProvider;
pub use provider::simulated::SimulatedProvider;
pub use provider::MarketDataProvider;
