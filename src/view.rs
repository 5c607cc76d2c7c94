//! Derived view over the song list: search filter, sort order and the display
//! layout. None of this is persisted; a fresh start always shows the table
//! sorted newest first.

use std::cmp::Ordering;

use crate::models::Song;

/// Sort orders offered by the sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Title, A to Z.
    Az,
    RatingDesc,
    RatingAsc,
    /// Most recently added first.
    #[default]
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Az,
        SortKey::RatingDesc,
        SortKey::RatingAsc,
    ];

    /// Map a selector value to a sort key. Unknown values sort newest first.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "az" => SortKey::Az,
            "ratingDesc" => SortKey::RatingDesc,
            "ratingAsc" => SortKey::RatingAsc,
            _ => SortKey::Newest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Az => "Title (A-Z)",
            SortKey::RatingDesc => "Rating (high to low)",
            SortKey::RatingAsc => "Rating (low to high)",
            SortKey::Newest => "Newest first",
        }
    }

    /// Next entry in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|key| *key == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn compare(&self, a: &Song, b: &Song) -> Ordering {
        match self {
            SortKey::Az => compare_titles(&a.title, &b.title),
            SortKey::RatingDesc => b.rating_or_zero().cmp(&a.rating_or_zero()),
            SortKey::RatingAsc => a.rating_or_zero().cmp(&b.rating_or_zero()),
            SortKey::Newest => b.date_added_or_zero().cmp(&a.date_added_or_zero()),
        }
    }
}

/// Case-insensitive title order; the raw text breaks ties so accented and
/// differently capitalized titles still land in a fixed order.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Which layout the list is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Table,
    Cards,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Table => DisplayMode::Cards,
            DisplayMode::Cards => DisplayMode::Table,
        }
    }

    /// Caption of the toggle control: it names the layout you switch *to*.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            DisplayMode::Table => "Cards View",
            DisplayMode::Cards => "Table View",
        }
    }
}

/// Transient view settings owned by the song list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub display: DisplayMode,
    pub search: String,
    pub sort: SortKey,
}

/// Filter and sort a copy of `songs`. The input is never reordered.
///
/// A blank search term keeps every song; otherwise a song stays when its
/// lowercased title contains the trimmed, lowercased term. Sorting is stable,
/// so songs with equal keys keep their stored order.
pub fn derive_view(songs: &[Song], search: &str, sort: SortKey) -> Vec<Song> {
    let term = search.trim().to_lowercase();
    let mut result: Vec<Song> = if term.is_empty() {
        songs.to_vec()
    } else {
        songs
            .iter()
            .filter(|song| song.title.to_lowercase().contains(&term))
            .cloned()
            .collect()
    };

    result.sort_by(|a, b| sort.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64, title: &str, rating: Option<i64>, date_added: Option<i64>) -> Song {
        Song {
            id,
            title: title.to_string(),
            url: String::new(),
            rating,
            date_added,
        }
    }

    fn titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    fn sample() -> Vec<Song> {
        vec![
            song(1, "banana", Some(3), Some(10)),
            song(2, "Apple", Some(9), Some(30)),
            song(3, "cherry", None, Some(20)),
            song(4, "apple pie", Some(3), None),
        ]
    }

    #[test]
    fn parse_falls_back_to_newest() {
        assert_eq!(SortKey::parse("az"), SortKey::Az);
        assert_eq!(SortKey::parse("ratingDesc"), SortKey::RatingDesc);
        assert_eq!(SortKey::parse("ratingAsc"), SortKey::RatingAsc);
        assert_eq!(SortKey::parse("newest"), SortKey::Newest);
        assert_eq!(SortKey::parse("shuffle"), SortKey::Newest);
        assert_eq!(SortKey::parse(""), SortKey::Newest);
        assert_eq!(SortKey::default(), SortKey::Newest);
    }

    #[test]
    fn next_cycles_through_every_key() {
        let mut key = SortKey::Newest;
        let mut seen = Vec::new();
        for _ in 0..SortKey::ALL.len() {
            seen.push(key);
            key = key.next();
        }
        assert_eq!(key, SortKey::Newest);
        assert_eq!(seen, SortKey::ALL.to_vec());
    }

    #[test]
    fn az_ignores_case() {
        let view = derive_view(&sample(), "", SortKey::Az);
        assert_eq!(titles(&view), ["Apple", "apple pie", "banana", "cherry"]);
    }

    #[test]
    fn rating_sorts_treat_missing_as_zero_and_keep_ties_stable() {
        let view = derive_view(&sample(), "", SortKey::RatingDesc);
        assert_eq!(titles(&view), ["Apple", "banana", "apple pie", "cherry"]);

        let view = derive_view(&sample(), "", SortKey::RatingAsc);
        assert_eq!(titles(&view), ["cherry", "banana", "apple pie", "Apple"]);
    }

    #[test]
    fn newest_sorts_by_date_added_descending() {
        let view = derive_view(&sample(), "", SortKey::Newest);
        assert_eq!(titles(&view), ["Apple", "cherry", "banana", "apple pie"]);
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let view = derive_view(&sample(), "  APPLE ", SortKey::Az);
        assert_eq!(titles(&view), ["Apple", "apple pie"]);

        let view = derive_view(&sample(), "   ", SortKey::Az);
        assert_eq!(view.len(), 4);

        assert!(derive_view(&sample(), "kiwi", SortKey::Az).is_empty());
    }

    #[test]
    fn source_collection_is_untouched() {
        let songs = sample();
        let before = songs.clone();
        let _ = derive_view(&songs, "a", SortKey::Az);
        assert_eq!(songs, before);
    }

    #[test]
    fn display_mode_toggle_is_symmetric() {
        let mode = DisplayMode::default();
        assert_eq!(mode, DisplayMode::Table);
        assert_eq!(mode.toggle(), DisplayMode::Cards);
        assert_eq!(mode.toggle().toggle(), DisplayMode::Table);
        assert_eq!(mode.toggle_label(), "Cards View");
        assert_eq!(mode.toggle().toggle_label(), "Table View");
    }
}
