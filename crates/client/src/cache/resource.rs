//! Cached download of a single versioned resource.
//!
//! A [`CachedResource`] pairs two store entries: the resource bytes under its
//! cache key and the version token under `<cache key>-version`. The two are
//! written in sequence, not atomically; a missing or mismatched version token
//! simply forces a refetch.

use futures_util::StreamExt;

use super::store::ByteStore;
use crate::transport::{Transport, TransportBody, TransportResponse};
use datapak_core::Error;

/// Suffix appended to the cache key to form the version token key.
const VERSION_SUFFIX: &str = "-version";

/// A progress observation for one transfer.
///
/// Purely observational: ignoring progress never changes what `get` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes transferred so far.
    pub received: u64,
    /// Total expected bytes. For streamed transfers this is the
    /// caller-declared expected length; for buffered transfers the
    /// header-reported length (0 when absent).
    pub total: u64,
    /// True when the bytes came from the persistent store, not the network.
    pub cached: bool,
}

/// How a `get` was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the store; no network access occurred.
    Hit,
    /// Nothing cached for this key; fetched from the network.
    Miss,
    /// A cached entry existed but its version token did not match.
    /// Refetched; the stale entry survived until overwritten.
    Stale {
        /// Version token found in the store, if it was readable.
        cached_version: Option<String>,
    },
}

/// Result of a `get`: the bytes plus machine-testable cache state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceData {
    /// The resource content.
    pub bytes: Vec<u8>,
    /// Hit, miss, or stale.
    pub status: CacheStatus,
    /// False when the write-back failed and the bytes are served uncached.
    pub persisted: bool,
}

/// Caches a single version of a resource.
///
/// Holds nothing beyond its descriptor: the resource URL and the cache key
/// (`url` plus an optional suffix, so one logical resource can carry several
/// independently versioned variants). Store and transport are borrowed per
/// call.
#[derive(Debug, Clone)]
pub struct CachedResource {
    url: String,
    cache_key: String,
}

impl CachedResource {
    /// Resource cached directly under its URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self { cache_key: url.clone(), url }
    }

    /// Resource variant cached under `url + suffix` (e.g. per-locale).
    pub fn with_key_suffix(url: impl Into<String>, suffix: &str) -> Self {
        let url = url.into();
        Self { cache_key: format!("{url}{suffix}"), url }
    }

    /// The storage key this variant's bytes live under.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// The URL the resource is downloaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve this resource to bytes for the required version.
    ///
    /// Consults the store first; on a hit, reports one terminal progress
    /// observation with `cached == true` and returns without network access.
    /// Otherwise streams the resource from the transport, reporting progress
    /// per chunk when `expected_len` is known, and writes the result back.
    ///
    /// Store failures during the cache check count as a miss; a write-back
    /// failure is logged and swallowed (`persisted` comes back false). Only
    /// a transfer failure makes this return an error.
    pub async fn get<S, T, F>(
        &self,
        store: &S,
        transport: &T,
        expected_len: Option<u64>,
        required_version: &str,
        mut progress: F,
    ) -> Result<ResourceData, Error>
    where
        S: ByteStore,
        T: Transport,
        F: FnMut(Progress),
    {
        let version_key = format!("{}{}", self.cache_key, VERSION_SUFFIX);

        // Optimistic reads: a store that cannot be read only costs a refetch.
        let cached = self.read_optimistic(store, &self.cache_key).await;
        let cached_version = self.read_optimistic(store, &version_key).await;

        let mut status = CacheStatus::Miss;
        if let Some(bytes) = cached {
            if cached_version.as_deref() == Some(required_version.as_bytes()) {
                tracing::debug!(key = %self.cache_key, url = %self.url, "using cached resource");
                let total = bytes.len() as u64;
                progress(Progress { received: total, total, cached: true });
                return Ok(ResourceData { bytes, status: CacheStatus::Hit, persisted: true });
            }

            let previous = cached_version.map(|v| String::from_utf8_lossy(&v).into_owned());
            tracing::info!(
                key = %self.cache_key,
                url = %self.url,
                required = %required_version,
                previous = previous.as_deref().unwrap_or("<none>"),
                "cached resource out of date, redownloading"
            );
            // The stale entry stays readable until the write-back overwrites
            // it, so a failed fetch leaves it intact for a later attempt.
            status = CacheStatus::Stale { cached_version: previous };
        }

        let response = transport.fetch(&self.url).await?;
        let bytes = read_body(response, expected_len, &mut progress).await?;
        tracing::debug!(url = %self.url, len = bytes.len(), "downloaded resource");

        let persisted = match self.write_back(store, &bytes, required_version, &version_key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    key = %self.cache_key,
                    error = %e,
                    "failed to persist resource, serving uncached"
                );
                false
            }
        };

        Ok(ResourceData { bytes, status, persisted })
    }

    async fn read_optimistic<S: ByteStore>(&self, store: &S, key: &str) -> Option<Vec<u8>> {
        match store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed, treating as cache miss");
                None
            }
        }
    }

    // Data first, then the version token. A crash between the two leaves a
    // missing token, which the next get treats as stale.
    async fn write_back<S: ByteStore>(
        &self,
        store: &S,
        bytes: &[u8],
        version: &str,
        version_key: &str,
    ) -> Result<(), Error> {
        store.set(&self.cache_key, bytes).await?;
        store.set(version_key, version.as_bytes()).await?;
        Ok(())
    }
}

/// Consume a transport response into bytes, reporting progress.
///
/// With a caller-declared expected length and a streaming body, chunks are
/// copied into a fixed buffer of that length with a progress observation
/// before the first chunk, after every chunk, and once the stream ends.
/// Otherwise the response is buffered whole after a single observation
/// carrying the header-reported length. The header length is never used for
/// allocation: it may be the compressed size.
async fn read_body<F>(
    response: TransportResponse,
    expected_len: Option<u64>,
    progress: &mut F,
) -> Result<Vec<u8>, Error>
where
    F: FnMut(Progress),
{
    let TransportResponse { content_length, body } = response;

    match (expected_len, body) {
        (Some(expected), TransportBody::Stream(mut stream)) => {
            let len = expected as usize;
            let mut buf = vec![0u8; len];
            let mut offset = 0usize;
            progress(Progress { received: 0, total: expected, cached: false });
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                let end = offset + chunk.len();
                if end > len {
                    return Err(Error::Transfer(format!(
                        "response exceeded expected length of {expected} bytes"
                    )));
                }
                buf[offset..end].copy_from_slice(&chunk);
                offset = end;
                progress(Progress { received: offset as u64, total: expected, cached: false });
            }
            progress(Progress { received: offset as u64, total: expected, cached: false });
            Ok(buf)
        }
        (_, body) => {
            progress(Progress { received: 0, total: content_length.unwrap_or(0), cached: false });
            match body {
                TransportBody::Buffered(bytes) => Ok(bytes.to_vec()),
                TransportBody::Stream(mut stream) => {
                    let mut buf = Vec::new();
                    while let Some(chunk) = stream.next().await {
                        buf.extend_from_slice(&chunk?);
                    }
                    Ok(buf)
                }
            }
        }
    }
}
