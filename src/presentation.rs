//! Maps the derived view to display rows. Both layouts show the same fields;
//! only the widget that draws them differs.

use crate::models::Song;
use crate::video::thumbnail_url;
use crate::view::DisplayMode;

/// Everything a layout needs to draw one song and wire its controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRow {
    /// Key passed back to edit and delete.
    pub id: i64,
    pub title: String,
    /// Blank when the song has no rating.
    pub rating_text: String,
    /// Outbound "Watch" link.
    pub url: String,
    /// Preview image address, absent for links without a video id.
    pub thumbnail: Option<String>,
    /// Percent-encoded url handed to the play control.
    pub play_token: String,
}

impl SongRow {
    pub fn from_song(song: &Song) -> Self {
        Self {
            id: song.id,
            title: song.title.clone(),
            rating_text: song.rating_text(),
            url: song.url.clone(),
            thumbnail: thumbnail_url(&song.url),
            play_token: urlencoding::encode(&song.url).into_owned(),
        }
    }
}

/// The rows for the active layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Table(Vec<SongRow>),
    Cards(Vec<SongRow>),
}

impl Layout {
    pub fn rows(&self) -> &[SongRow] {
        match self {
            Layout::Table(rows) | Layout::Cards(rows) => rows,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        match self {
            Layout::Table(_) => DisplayMode::Table,
            Layout::Cards(_) => DisplayMode::Cards,
        }
    }
}

pub fn present(songs: &[Song], mode: DisplayMode) -> Layout {
    let rows = songs.iter().map(SongRow::from_song).collect();
    match mode {
        DisplayMode::Table => Layout::Table(rows),
        DisplayMode::Cards => Layout::Cards(rows),
    }
}
