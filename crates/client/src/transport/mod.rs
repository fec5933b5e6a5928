//! Network transfer interface.
//!
//! The cache depends on a transport only through the [`Transport`] trait:
//! respond with headers, then either a fully-buffered payload or an
//! incremental byte-chunk stream until exhausted. The concrete HTTP
//! implementation lives in [`http`].
//!
//! The transport's content-length header is carried separately from any
//! caller-declared expected length: it may reflect a compressed size (or be
//! absent entirely under transfer-encoding), so it is never trusted for
//! buffer allocation.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use datapak_core::Error;

pub use http::{HttpTransport, TransportConfig};

/// Response body: either buffered up front or consumed incrementally.
pub enum TransportBody {
    /// The whole payload, read in one piece.
    Buffered(Bytes),
    /// Byte chunks yielded until the stream is exhausted.
    Stream(BoxStream<'static, Result<Bytes, Error>>),
}

/// Response from a transfer: header-derived length plus the body.
pub struct TransportResponse {
    /// Content-Length as reported by the transport. Untrusted: may be the
    /// compressed size rather than the decoded payload size, or absent.
    pub content_length: Option<u64>,
    /// The response body.
    pub body: TransportBody,
}

/// A GET-style network transfer for a resource URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and return headers plus body.
    ///
    /// A failed or non-success response surfaces as [`Error::Transfer`];
    /// there is no retry at this layer.
    async fn fetch(&self, url: &str) -> Result<TransportResponse, Error>;
}
