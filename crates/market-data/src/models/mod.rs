//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `quote` - OHLCV quote snapshots (Quote)
//! - `symbol` - Symbol directory rows (SymbolInfo)
//! - `interval` - Refresh cadence labels (Interval)

mod interval;
mod quote;
mod symbol;

pub use interval::Interval;
pub use quote::Quote;
pub use symbol::SymbolInfo;
