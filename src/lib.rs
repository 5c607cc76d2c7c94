//! Core library surface for the Song List Manager TUI application.
//!
//! The song list itself (`library`), its derived view (`view`) and the
//! persistence gateway (`db`) have no dependency on the terminal, so they can
//! be driven headlessly; `ui` is one consumer of them.
pub mod clock;
pub mod config;
pub mod db;
pub mod library;
pub mod logging;
pub mod models;
pub mod playback;
pub mod presentation;
pub mod ui;
pub mod video;
pub mod view;

/// Persistence entry points used by `main.rs` to open the embedded store.
pub use db::{ensure_schema, BlobStore, MemoryBlobStore, SqliteBlobStore};

/// Domain types other layers manipulate.
pub use library::{FormMode, SongList, SubmitOutcome};
pub use models::{Song, SongDraft};
pub use view::{DisplayMode, SortKey};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
