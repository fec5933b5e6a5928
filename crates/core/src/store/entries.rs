//! Key-value operations over the entries table.
//!
//! Provides the store handle used by the resource cache: opaque string keys
//! mapped to binary values inside a named collection.

use super::connection::StoreDb;
use crate::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Handle to one collection inside a store database.
///
/// Construction performs no I/O: the underlying connection is opened lazily
/// by the first `get` or `set`, and concurrent callers racing before setup
/// completes all converge on the same connection (setup runs at most once).
/// Cloning the handle shares the same lazily-initialized connection.
#[derive(Clone, Debug)]
pub struct KvStore {
    path: PathBuf,
    collection: String,
    db: Arc<OnceCell<StoreDb>>,
}

impl KvStore {
    /// Open a store at the specified database path, scoped to a collection.
    ///
    /// Idempotent: the database file and schema are created on first use and
    /// reused afterwards. Several collections may share one database file.
    pub fn open(path: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self { path: path.into(), collection: collection.into(), db: Arc::new(OnceCell::new()) }
    }

    /// Open a store over an in-memory database for testing.
    pub async fn in_memory(collection: impl Into<String>) -> Result<Self, Error> {
        let db = StoreDb::open_in_memory().await?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            collection: collection.into(),
            db: Arc::new(OnceCell::new_with(Some(db))),
        })
    }

    /// The collection this handle is scoped to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn db(&self) -> Result<&StoreDb, Error> {
        self.db.get_or_try_init(|| StoreDb::open(&self.path)).await
    }

    /// Get the value stored under a key.
    ///
    /// Returns None if the key was never set.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let db = self.db().await?;
        let collection = self.collection.clone();
        let key = key.to_string();
        db.conn
            .call(move |conn| -> Result<Option<Vec<u8>>, Error> {
                let result = conn.query_row(
                    "SELECT value FROM entries WHERE collection = ?1 AND key = ?2",
                    params![collection, key],
                    |row| row.get(0),
                );

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Durably write a value under a key, replacing any prior value.
    pub async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        let db = self.db().await?;
        let collection = self.collection.clone();
        let key = key.to_string();
        let value = value.to_vec();
        let stored_at = chrono::Utc::now().to_rfc3339();
        db.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (collection, key, value, stored_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(collection, key) DO UPDATE SET
                        value = excluded.value,
                        stored_at = excluded.stored_at",
                    params![collection, key, value, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}
