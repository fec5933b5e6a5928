//! Client code for datapak.
//!
//! This crate provides the HTTP transport and the versioned resource cache
//! that resolves a resource URL plus required version into bytes, using the
//! persistent store from datapak-core.

pub mod cache;
pub mod transport;

pub use cache::{ByteStore, CacheStatus, CachedResource, Progress, ResourceData};
pub use transport::{HttpTransport, Transport, TransportBody, TransportConfig, TransportResponse};
