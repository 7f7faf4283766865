//! Quotecast Server - HTTP and WebSocket front end for the quote engine.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod scheduler;
pub mod ws;

pub use config::Config;
pub use main_lib::{build_state, init_tracing, AppState};
