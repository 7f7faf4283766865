//! Outbound delivery boundary.

use async_trait::async_trait;

use crate::errors::DeliveryError;

/// Connection-addressable outbound message channel.
///
/// `send` is expected to fail for connections that have gone away between
/// the registry scan and the delivery attempt. Callers treat such failures
/// as routine per-connection noise, not broadcast errors.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Deliver an opaque payload to one connection.
    async fn send(&self, connection_id: &str, payload: &[u8]) -> Result<(), DeliveryError>;
}
