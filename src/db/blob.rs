use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Failures raised by a blob store. Callers in the gateway decide whether a
/// failure is fatal (writes) or silently degrades (reads).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read key `{key}`")]
    Read {
        key: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to write key `{key}`")]
    Write {
        key: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// A flat key-value store holding whole serialized snapshots.
pub trait BlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Overwrite the value stored under `key`. Last writer wins.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Blob store backed by the `kv_store` table of the embedded SQLite file.
pub struct SqliteBlobStore {
    conn: Connection,
}

impl SqliteBlobStore {
    /// Wrap a connection whose schema has already been prepared by
    /// `ensure_schema`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl BlobStore for SqliteBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| StoreError::Read {
                key: key.to_string(),
                source,
            })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// Volatile store for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    entries: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single pre-seeded entry, e.g. a hand-written blob.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
