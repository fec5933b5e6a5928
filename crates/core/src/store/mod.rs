//! SQLite-backed persistent key-value store for large binary resources.
//!
//! This module provides a durable, asynchronous byte store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Opaque string keys mapped to binary values, scoped by collection
//! - Lazy, at-most-once connection setup shared across concurrent callers
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//!
//! Values are sized for game data packages (tens to hundreds of megabytes).
//! Each get/set is independently transactional; there is no multi-key
//! atomicity and no deletion surface.

pub mod connection;
pub mod entries;
pub mod migrations;

pub use crate::Error;

pub use connection::StoreDb;
pub use entries::KvStore;
