//! Unified error types for datapak.

use tokio_rusqlite::rusqlite;

/// Unified error types for the datapak resource cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The persistent store could not be opened, read, or written
    /// (quota, permissions, restricted browsing mode).
    #[error("storage unavailable: {0}")]
    Storage(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("storage unavailable: migration failed: {0}")]
    MigrationFailed(String),

    /// The network request failed or aborted mid-stream.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// Resource URL failed to parse.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Storage(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Storage(tokio_rusqlite::Error::Close(c)),
            _ => Error::Storage(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Storage(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Transfer("connection reset".to_string());
        assert!(err.to_string().contains("transfer failed"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_storage_error_from_rusqlite() {
        let err = Error::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, Error::Storage(_)));
    }
}
