//! Symbol directory module.
//!
//! Mirrors the provider's symbol catalog into a local directory:
//!
//! - [`store`] - Storage trait plus the in-memory backend
//! - [`service`] - Chunked catalog refresh

pub mod service;
pub mod store;

// Re-export commonly used types for convenience
pub use service::{DirectoryRefreshReport, DirectoryWriteFailure, SymbolDirectoryService};
pub use store::{InMemorySymbolStore, SymbolStore};
