use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Song, SongDraft};

/// Form state for song creation/editing. Whether a submit creates or updates
/// is decided by the song list's form mode, not by the form itself.
#[derive(Default, Clone)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) rating: String,
    pub(crate) active: SongField,
}

/// Enumerates the fields within the song form to drive focus management.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum SongField {
    #[default]
    Title,
    Url,
    Rating,
}

impl SongForm {
    /// Fill the fields from a draft handed out by the song list.
    pub(crate) fn from_draft(draft: SongDraft) -> Self {
        Self {
            title: draft.title,
            url: draft.url,
            rating: draft.rating,
            active: SongField::Title,
        }
    }

    /// Snapshot of the typed values for submission.
    pub(crate) fn draft(&self) -> SongDraft {
        SongDraft::new(self.title.clone(), self.url.clone(), self.rating.clone())
    }

    /// Cycle focus forward across the three fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            SongField::Title => SongField::Url,
            SongField::Url => SongField::Rating,
            SongField::Rating => SongField::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            SongField::Title => SongField::Rating,
            SongField::Url => SongField::Title,
            SongField::Rating => SongField::Url,
        };
    }

    /// Insert a character into the active field. The rating only takes digits
    /// and a leading minus sign.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SongField::Title => self.title.push(ch),
            SongField::Url => self.url.push(ch),
            SongField::Rating => {
                let leading_minus = ch == '-' && self.rating.is_empty();
                if !ch.is_ascii_digit() && !leading_minus {
                    return false;
                }
                self.rating.push(ch);
            }
        }
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            SongField::Title => {
                self.title.pop();
            }
            SongField::Url => {
                self.url.pop();
            }
            SongField::Rating => {
                self.rating.pop();
            }
        }
    }

    fn value(&self, field: SongField) -> &str {
        match field {
            SongField::Title => &self.title,
            SongField::Url => &self.url,
            SongField::Rating => &self.rating,
        }
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field_name: &str, field: SongField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character length of the requested field.
    pub(crate) fn value_len(&self, field: SongField) -> usize {
        self.value(field).chars().count()
    }
}

/// State for confirming permanent song deletion.
pub(crate) struct ConfirmSongDelete {
    pub(crate) song: Song,
}

/// State for an active inline search. The query is pushed into the song list
/// on every keystroke so the view narrows while typing.
pub(crate) struct SearchState {
    pub(crate) query: String,
}
