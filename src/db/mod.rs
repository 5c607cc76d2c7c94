//! Persistence split into the raw key-value store, its SQLite connection
//! setup, and the song gateway on top.

mod blob;
mod connection;
mod songs;

pub use blob::{BlobStore, MemoryBlobStore, SqliteBlobStore, StoreError};
pub use connection::ensure_schema;
pub use songs::{load_songs, save_songs};
