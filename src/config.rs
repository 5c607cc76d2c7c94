//! Runtime configuration. Everything has a sensible default under the user's
//! home directory; environment variables override individual pieces.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;
use log::LevelFilter;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".song-list-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "songs.sqlite";
const LOG_FILE_NAME: &str = "song-list-manager.log";
/// Blob key the song list lives under.
pub const DEFAULT_STORAGE_KEY: &str = "songs";

const DATA_DIR_ENV: &str = "SONG_LIST_DATA_DIR";
const STORAGE_KEY_ENV: &str = "SONG_LIST_STORAGE_KEY";
const LOG_LEVEL_ENV: &str = "SONG_LIST_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub log_level: LevelFilter,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, with the variable lookup injected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match non_blank(lookup(DATA_DIR_ENV)) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let storage_key =
            non_blank(lookup(STORAGE_KEY_ENV)).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        let log_level = non_blank(lookup(LOG_LEVEL_ENV))
            .and_then(|raw| raw.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);

        Ok(Self {
            data_dir,
            storage_key,
            log_level,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve `~/.song-list-manager`.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[test]
    fn overrides_come_from_the_environment() {
        let config = config_with(&[
            (DATA_DIR_ENV, "/tmp/songs"),
            (STORAGE_KEY_ENV, "playlist"),
            (LOG_LEVEL_ENV, "debug"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/songs"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/songs/songs.sqlite"));
        assert_eq!(
            config.log_path(),
            PathBuf::from("/tmp/songs/song-list-manager.log")
        );
        assert_eq!(config.storage_key, "playlist");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn blank_or_unknown_values_fall_back() {
        let config = config_with(&[
            (DATA_DIR_ENV, "/srv/data"),
            (STORAGE_KEY_ENV, "  "),
            (LOG_LEVEL_ENV, "chatty"),
        ]);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
