//! Domain models shared by the persistence gateway, the song list state and
//! the TUI. They stay plain data holders; the rules about how they change live
//! in `library`.

use serde::Serialize;

/// Rating pre-filled into a fresh form and used when an edited song has none.
pub const DEFAULT_RATING: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// A song in the user's list. Field names on the wire match the stored JSON
/// blob (`id`, `title`, `url`, `rating`, `dateAdded`); reading that blob back
/// is done leniently by `db::load_songs`.
pub struct Song {
    /// Creation stamp in milliseconds; doubles as the lookup key for edit and
    /// delete, so it never changes after creation.
    pub id: i64,
    pub title: String,
    /// Raw link as typed by the user. Usually a video page, but anything
    /// non-empty is accepted.
    pub url: String,
    /// Older blobs may lack a rating; it then sorts as zero and shows blank.
    pub rating: Option<i64>,
    pub date_added: Option<i64>,
}

impl Song {
    /// Rating used by the numeric sorts.
    pub fn rating_or_zero(&self) -> i64 {
        self.rating.unwrap_or(0)
    }

    /// Creation time used by the "newest" sort.
    pub fn date_added_or_zero(&self) -> i64 {
        self.date_added.unwrap_or(0)
    }

    /// Rating as display text, blank when absent.
    pub fn rating_text(&self) -> String {
        self.rating.map(|r| r.to_string()).unwrap_or_default()
    }
}

/// Raw, unvalidated form input. The rating stays text until submission so the
/// form can hold whatever the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub url: String,
    pub rating: String,
}

impl Default for SongDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            rating: DEFAULT_RATING.to_string(),
        }
    }
}

impl SongDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            rating: rating.into(),
        }
    }

    /// Populate a draft from an existing song when entering edit mode.
    pub fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            url: song.url.clone(),
            rating: song.rating.unwrap_or(DEFAULT_RATING).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_rating_shows_blank_and_sorts_as_zero() {
        let song = Song {
            id: 7,
            title: "Intro".into(),
            url: String::new(),
            rating: None,
            date_added: None,
        };
        assert_eq!(song.rating_text(), "");
        assert_eq!(song.rating_or_zero(), 0);
        assert_eq!(song.date_added_or_zero(), 0);
    }

    #[test]
    fn serializes_with_camel_case_date_added() {
        let song = Song {
            id: 1,
            title: "A".into(),
            url: "u".into(),
            rating: Some(4),
            date_added: Some(1),
        };
        let json = serde_json::to_string(&song).unwrap();
        assert!(json.contains("\"dateAdded\":1"));
    }

    #[test]
    fn draft_from_song_defaults_missing_rating() {
        let song = Song {
            id: 1,
            title: "A".into(),
            url: "u".into(),
            rating: None,
            date_added: None,
        };
        assert_eq!(SongDraft::from_song(&song).rating, "5");
    }
}
