//! Access to the REST backend: cached, retried, normalized.

mod cache;
mod client;
mod error;

pub use cache::{CacheStats, CircuitBreaker, SessionKey, SnapshotCacheState, SnapshotCacheStats, TtlCache};
pub use client::{BackendClient, BackendConfig};
pub use error::BackendError;
