//! Binary entry point: resolve configuration, start file logging, open the
//! SQLite-backed blob store, hydrate the song list and drive the Ratatui event
//! loop until the user exits.
use song_list_manager::clock::SystemClock;
use song_list_manager::config::Config;
use song_list_manager::logging;
use song_list_manager::playback::BrowserPlayer;
use song_list_manager::{ensure_schema, run_app, App, SongList, SqliteBlobStore};

/// Returning a `Result` bubbles up fatal initialization problems (for example
/// a missing home directory or an unwritable data directory) to the terminal.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;

    let conn = ensure_schema(&config.db_path())?;
    let store = SqliteBlobStore::new(conn);
    let list = SongList::load(Box::new(store), Box::new(SystemClock), &config.storage_key);

    let mut app = App::new(list, Box::new(BrowserPlayer::default()));
    run_app(&mut app)
}
