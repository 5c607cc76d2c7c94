//! The song list state object: the in-memory collection, the form mode and
//! the view settings, plus the create/update/delete operations that keep the
//! persisted blob in step with memory. Nothing here knows about rendering, so
//! every operation can be driven headlessly.

use anyhow::Result;
use log::{debug, info, warn};
use thiserror::Error;

use crate::clock::{Clock, IdAllocator};
use crate::db::{load_songs, save_songs, BlobStore};
use crate::models::{Song, SongDraft};
use crate::view::{derive_view, DisplayMode, SortKey, ViewState};

/// Why a submission was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is empty")]
    EmptyTitle,
    #[error("url is empty")]
    EmptyUrl,
    #[error("rating `{0}` is not a whole number")]
    InvalidRating(String),
}

/// Whether the form creates a new song or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Creating,
    Editing(i64),
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(i64),
    Updated(i64),
    /// The song being edited no longer exists. Nothing changed.
    Missing(i64),
    /// Invalid input; the form and the collection are left as they were.
    Rejected(ValidationError),
    /// Every id above the largest stored one is taken. Nothing changed.
    NoFreeId,
}

/// Validated form values.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SongFields {
    title: String,
    url: String,
    rating: i64,
}

fn validate(draft: &SongDraft) -> Result<SongFields, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let url = draft.url.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    let rating = draft
        .rating
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidRating(draft.rating.clone()))?;
    Ok(SongFields {
        title: title.to_string(),
        url: url.to_string(),
        rating,
    })
}

/// Central state shared by every handler.
pub struct SongList {
    store: Box<dyn BlobStore>,
    clock: Box<dyn Clock>,
    key: String,
    songs: Vec<Song>,
    ids: IdAllocator,
    form: FormMode,
    view: ViewState,
}

impl SongList {
    /// Hydrate from whatever is stored under `key`. Unreadable data starts an
    /// empty list.
    pub fn load(store: Box<dyn BlobStore>, clock: Box<dyn Clock>, key: impl Into<String>) -> Self {
        let key = key.into();
        let songs = load_songs(store.as_ref(), &key);
        let ids = IdAllocator::seeded(songs.iter().map(|song| song.id));
        info!("song list ready with {} songs", songs.len());
        Self {
            store,
            clock,
            key,
            songs,
            ids,
            form: FormMode::Creating,
            view: ViewState::default(),
        }
    }

    /// Songs in stored order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn get(&self, id: i64) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn form_mode(&self) -> FormMode {
        self.form
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Filtered and sorted copy for rendering.
    pub fn view(&self) -> Vec<Song> {
        derive_view(&self.songs, &self.view.search, self.view.sort)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.view.search = term.into();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
    }

    /// Flip between table and card layouts and return the new one.
    pub fn toggle_display(&mut self) -> DisplayMode {
        self.view.display = self.view.display.toggle();
        self.view.display
    }

    /// Enter edit mode for `id` and hand back the values to show in the form.
    pub fn begin_edit(&mut self, id: i64) -> Option<SongDraft> {
        let draft = SongDraft::from_song(self.get(id)?);
        self.form = FormMode::Editing(id);
        Some(draft)
    }

    /// Leave edit mode and return a blank form.
    pub fn reset_form(&mut self) -> SongDraft {
        self.form = FormMode::Creating;
        SongDraft::default()
    }

    /// Create or update depending on the form mode. Invalid input is reported
    /// as `Rejected` and changes nothing, not even the form mode.
    pub fn submit(&mut self, draft: &SongDraft) -> Result<SubmitOutcome> {
        let fields = match validate(draft) {
            Ok(fields) => fields,
            Err(reason) => {
                debug!("ignoring submission: {reason}");
                return Ok(SubmitOutcome::Rejected(reason));
            }
        };

        let outcome = match self.form {
            FormMode::Creating => match self.create(fields) {
                Some(id) => SubmitOutcome::Created(id),
                None => {
                    warn!("cannot add a song, no id left above the stored ones");
                    return Ok(SubmitOutcome::NoFreeId);
                }
            },
            FormMode::Editing(id) => {
                if self.update(id, fields) {
                    SubmitOutcome::Updated(id)
                } else {
                    debug!("update skipped, song {id} not found");
                    SubmitOutcome::Missing(id)
                }
            }
        };
        // Memory has changed already; edit mode ends even if the write fails.
        self.form = FormMode::Creating;

        if let SubmitOutcome::Created(id) | SubmitOutcome::Updated(id) = outcome {
            self.persist()?;
            info!("saved song {id}");
        }
        Ok(outcome)
    }

    fn create(&mut self, fields: SongFields) -> Option<i64> {
        let stamp = self.ids.next(self.clock.now_millis())?;
        self.songs.push(Song {
            id: stamp,
            title: fields.title,
            url: fields.url,
            rating: Some(fields.rating),
            date_added: Some(stamp),
        });
        Some(stamp)
    }

    /// Overwrite the editable fields of `id`; `id` and `date_added` stay.
    fn update(&mut self, id: i64, fields: SongFields) -> bool {
        let Some(song) = self.songs.iter_mut().find(|song| song.id == id) else {
            return false;
        };
        song.title = fields.title;
        song.url = fields.url;
        song.rating = Some(fields.rating);
        true
    }

    /// Remove the song with `id` once `confirm` agrees. Declining, or asking
    /// for an id that is not in the list, leaves memory and storage untouched
    /// and returns `false`.
    pub fn delete<F>(&mut self, id: i64, confirm: F) -> Result<bool>
    where
        F: FnOnce(&Song) -> bool,
    {
        let Some(song) = self.get(id) else {
            debug!("delete skipped, song {id} not found");
            return Ok(false);
        };
        if !confirm(song) {
            debug!("delete of song {id} declined");
            return Ok(false);
        }

        self.songs.retain(|song| song.id != id);
        if self.form == FormMode::Editing(id) {
            self.form = FormMode::Creating;
        }
        self.persist()?;
        info!("deleted song {id}");
        Ok(true)
    }

    fn persist(&mut self) -> Result<()> {
        save_songs(self.store.as_mut(), &self.key, &self.songs)
    }
}
