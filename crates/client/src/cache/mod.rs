//! Versioned resource cache.
//!
//! Resolves a resource URL plus required version token into bytes with
//! at-most-one-network-fetch-per-valid-version semantics:
//!
//! - Cache hit: bytes served from the persistent store, no network access
//! - Miss or stale version: stream the resource over the transport with
//!   per-chunk progress reporting, then write it back for next time
//! - Storage failure during write-back is logged and swallowed; the fresh
//!   bytes are still returned

pub mod resource;
pub mod store;

pub use resource::{CacheStatus, CachedResource, Progress, ResourceData};
pub use store::ByteStore;
