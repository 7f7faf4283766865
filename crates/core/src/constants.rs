/// Symbols fetched and persisted concurrently per refresh chunk.
///
/// Chunks run sequentially; the chunk size bounds peak concurrency against
/// the provider and the store. Tunable per service instance.
pub const DEFAULT_REFRESH_CHUNK_SIZE: usize = 10;

/// Directory rows written per batch when refreshing the symbol directory.
pub const DEFAULT_DIRECTORY_CHUNK_SIZE: usize = 25;

/// Upper bound on one push-channel send during a broadcast.
///
/// Each connection's delivery times out independently so a stalled
/// connection cannot stall the rest of the fan out.
pub const BROADCAST_SEND_TIMEOUT_MS: u64 = 5_000;
