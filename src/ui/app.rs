use std::cmp::min;
use std::mem;

use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;

use crate::library::{FormMode, SongList, SubmitOutcome};
use crate::models::Song;
use crate::playback::{play_encoded, PlaybackSurface};
use crate::presentation::{present, Layout as SongLayout, SongRow};
use crate::video::embed_url;
use crate::view::DisplayMode;

use super::forms::{ConfirmSongDelete, SearchState, SongField, SongForm};
use super::helpers::{centered_rect, clamp_selection, offset_selection, surface_error};

/// Header with the title, sort order, search term and layout toggle.
const HEADER_HEIGHT: u16 = 3;
/// "Now Playing" panel below the list.
const PLAYER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per song card in the card layout.
const SONG_CARD_HEIGHT: u16 = 6;
const PAGE_STEP: isize = 5;

/// Which overlay, if any, currently owns the keyboard.
enum Mode {
    Normal,
    EditingForm(SongForm),
    ConfirmSongDelete(ConfirmSongDelete),
    Searching(SearchState),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end around a `SongList`. Selection indexes into the derived
/// view, which is recomputed from the list on every key press and frame.
pub struct App {
    list: SongList,
    player: Box<dyn PlaybackSurface>,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(list: SongList, player: Box<dyn PlaybackSurface>) -> Self {
        Self {
            list,
            player,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn list(&self) -> &SongList {
        &self.list
    }

    /// Dispatch one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::EditingForm(form) => self.handle_form(code, form),
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm),
            Mode::Searching(state) => self.handle_search(code, state),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let view = self.list.view();
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                if !self.list.view_state().search.trim().is_empty() {
                    self.list.set_search("");
                    self.selected = 0;
                    self.set_status("Search cleared.", StatusKind::Info);
                }
            }
            KeyCode::Up => self.move_selection(-1, view.len()),
            KeyCode::Down => self.move_selection(1, view.len()),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP, view.len()),
            KeyCode::PageDown => self.move_selection(PAGE_STEP, view.len()),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = view.len().saturating_sub(1),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::EditingForm(SongForm::from_draft(self.list.reset_form()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                match view.get(self.selected) {
                    Some(song) => {
                        if let Some(draft) = self.list.begin_edit(song.id) {
                            self.clear_status();
                            return Mode::EditingForm(SongForm::from_draft(draft));
                        }
                    }
                    None => self.set_status("No song selected to edit.", StatusKind::Error),
                }
            }
            KeyCode::Char('-') | KeyCode::Char('d') => match view.get(self.selected) {
                Some(song) => {
                    self.clear_status();
                    return Mode::ConfirmSongDelete(ConfirmSongDelete { song: song.clone() });
                }
                None => self.set_status("No song selected to delete.", StatusKind::Error),
            },
            KeyCode::Enter | KeyCode::Char(' ') => self.play_selected(&view),
            KeyCode::Char('w') | KeyCode::Char('W') => self.watch_selected(&view),
            KeyCode::Char('f') | KeyCode::Char('/') => {
                return Mode::Searching(SearchState {
                    query: self.list.view_state().search.clone(),
                });
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                let sort = self.list.view_state().sort.next();
                self.list.set_sort(sort);
                self.selected = 0;
                self.set_status(format!("Sorted by {}.", sort.label()), StatusKind::Info);
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                let display = self.list.toggle_display();
                let message = match display {
                    DisplayMode::Table => "Showing table view.",
                    DisplayMode::Cards => "Showing cards view.",
                };
                self.set_status(message, StatusKind::Info);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_form(&mut self, code: KeyCode, mut form: SongForm) -> Mode {
        match code {
            KeyCode::Esc => {
                if let FormMode::Editing(_) = self.list.form_mode() {
                    self.set_status("Edit cancelled.", StatusKind::Info);
                }
                self.list.reset_form();
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.list.submit(&form.draft()) {
                Ok(SubmitOutcome::Created(id)) => {
                    self.select_song(id);
                    self.set_status("Song added.", StatusKind::Info);
                    return Mode::Normal;
                }
                Ok(SubmitOutcome::Updated(id)) => {
                    self.select_song(id);
                    self.set_status("Song updated.", StatusKind::Info);
                    return Mode::Normal;
                }
                Ok(SubmitOutcome::Missing(_)) => return Mode::Normal,
                Ok(SubmitOutcome::NoFreeId) => {
                    self.set_status("No id left for a new song.", StatusKind::Error);
                    return Mode::Normal;
                }
                // Invalid input keeps the form open with what was typed.
                Ok(SubmitOutcome::Rejected(_)) => {}
                Err(err) => {
                    self.set_status(surface_error(&err), StatusKind::Error);
                    return Mode::Normal;
                }
            },
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Mode::EditingForm(form)
    }

    fn handle_confirm_song_delete(&mut self, code: KeyCode, confirm: ConfirmSongDelete) -> Mode {
        let confirmed = match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => false,
            _ => return Mode::ConfirmSongDelete(confirm),
        };

        match self.list.delete(confirm.song.id, |_| confirmed) {
            Ok(true) => {
                self.selected = clamp_selection(self.selected, self.list.view().len());
                self.set_status("Song deleted.", StatusKind::Info);
            }
            Ok(false) if !confirmed => self.set_status("Deletion cancelled.", StatusKind::Info),
            Ok(false) => {}
            Err(err) => {
                self.selected = clamp_selection(self.selected, self.list.view().len());
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.list.set_search("");
                self.selected = 0;
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => {
                self.move_selection(-1, self.list.view().len());
                return Mode::Searching(state);
            }
            KeyCode::Down => {
                self.move_selection(1, self.list.view().len());
                return Mode::Searching(state);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Searching(state),
        }

        self.list.set_search(state.query.clone());
        self.selected = 0;
        Mode::Searching(state)
    }

    /// Point the player at the selected song. Links without a video id do
    /// nothing.
    fn play_selected(&mut self, view: &[Song]) {
        let Some(song) = view.get(self.selected) else {
            self.set_status("No song selected.", StatusKind::Error);
            return;
        };
        let row = SongRow::from_song(song);
        match play_encoded(self.player.as_mut(), &row.play_token) {
            Ok(Some(_)) => self.set_status(format!("Playing {}.", row.title), StatusKind::Info),
            Ok(None) => {}
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    /// Open the raw link of the selected song in the browser.
    fn watch_selected(&mut self, view: &[Song]) {
        let Some(song) = view.get(self.selected) else {
            self.set_status("No song selected.", StatusKind::Error);
            return;
        };
        if let Err(err) = open_link(&song.url) {
            self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened {}.", song.title), StatusKind::Info);
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(PLAYER_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let view = self.list.view();
        let layout = present(&view, self.list.view_state().display);

        self.draw_header(frame, chunks[0]);
        self.draw_songs(frame, chunks[1], &layout);
        self.draw_player(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        match &self.mode {
            Mode::EditingForm(form) => {
                let title = match self.list.form_mode() {
                    FormMode::Creating => "Add Song",
                    FormMode::Editing(_) => "Update Song",
                };
                self.draw_song_form(frame, area, title, form);
            }
            Mode::ConfirmSongDelete(confirm) => {
                self.draw_confirm_song_delete(frame, area, confirm)
            }
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let state = self.list.view_state();
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let search = if state.search.trim().is_empty() {
            Span::styled("(none)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(state.search.clone())
        };

        let line = Line::from(vec![
            Span::styled("Song List", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   Sort: "),
            Span::raw(state.sort.label()),
            Span::raw("   Search: "),
            search,
            Span::raw("   "),
            Span::styled("[v]", key_style),
            Span::raw(format!(" {}", state.display.toggle_label())),
        ]);

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn draw_songs(&self, frame: &mut Frame, area: Rect, layout: &SongLayout) {
        if area.height == 0 {
            return;
        }

        let message = if self.list.songs().is_empty() {
            Some("No songs yet. Press '+' to add one.")
        } else if layout.rows().is_empty() {
            Some("No songs match the current search.")
        } else {
            None
        };
        if let Some(message) = message {
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Songs"));
            frame.render_widget(paragraph, area);
            return;
        }

        match layout {
            SongLayout::Table(rows) => self.render_song_table(frame, area, rows),
            SongLayout::Cards(rows) => self.render_song_cards(frame, area, rows),
        }
    }

    /// Whether the player currently shows this row's video.
    fn is_playing(&self, row: &SongRow) -> bool {
        match (self.player.current(), embed_url(&row.url)) {
            (Some(current), Some(address)) => current == address,
            _ => false,
        }
    }

    fn play_marker(&self, row: &SongRow) -> &'static str {
        if self.is_playing(row) {
            "(•)"
        } else {
            "( )"
        }
    }

    fn render_song_table(&self, frame: &mut Frame, area: Rect, rows: &[SongRow]) {
        let header = Row::new(vec!["Play", "Title", "Rating", "Link", "Thumbnail"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let table_rows: Vec<Row> = rows
            .iter()
            .map(|row| {
                Row::new(vec![
                    Cell::from(self.play_marker(row)),
                    Cell::from(row.title.clone()),
                    Cell::from(row.rating_text.clone()),
                    Cell::from(Span::styled(
                        row.url.clone(),
                        Style::default().fg(Color::Cyan),
                    )),
                    Cell::from(Span::styled(
                        row.thumbnail.clone().unwrap_or_default(),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ];

        let table = Table::new(table_rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Songs"))
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, rows: &[SongRow]) {
        let selected = self.selected;
        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = rows.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in chunks.iter().enumerate() {
            let row_index = start + idx;
            if chunk.height == 0 || row_index >= len {
                continue;
            }
            let row = &rows[row_index];
            let is_selected = row_index == selected;

            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let title = if is_selected {
                format!("▶ {}", row.title)
            } else {
                row.title.clone()
            };
            let mut lines = vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Rating: {}", row.rating_text)),
                Line::from(vec![
                    Span::raw(format!("{} Play   ", self.play_marker(row))),
                    Span::raw("Watch: "),
                    Span::styled(row.url.clone(), Style::default().fg(Color::Cyan)),
                ]),
            ];
            if let Some(thumbnail) = &row.thumbnail {
                lines.push(Line::from(Span::styled(
                    thumbnail.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_player(&self, frame: &mut Frame, area: Rect) {
        let line = match self.player.current() {
            Some(address) => Line::from(Span::styled(
                address.to_string(),
                Style::default().fg(Color::Cyan),
            )),
            None => Line::from(Span::styled(
                "Nothing playing. Select a song and press Enter.",
                Style::default().fg(Color::DarkGray),
            )),
        };
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("Now Playing"));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let pairs: &[(&str, &str)] = match &self.mode {
            Mode::EditingForm(_) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmSongDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
            Mode::Searching(_) => &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Keep Filter   "),
                ("[Esc]", " Clear"),
            ],
            Mode::Normal => &[
                ("[↑↓]", " Select   "),
                ("[Enter]", " Play   "),
                ("[w]", " Watch   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[f]", " Search   "),
                ("[o]", " Sort   "),
                ("[v]", " Layout   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = pairs
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &SongForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [
            ("Title", SongField::Title),
            ("URL", SongField::Url),
            ("Rating", SongField::Rating),
        ];
        let mut lines: Vec<Line> = fields
            .iter()
            .map(|(name, field)| form.build_line(name, *field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to save • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some((row, (name, field))) = fields
            .iter()
            .enumerate()
            .find(|(_, (_, field))| *field == form.active)
        {
            let prefix = format!("{name}: ").len() as u16;
            let cursor_x = inner.x + prefix + form.value_len(*field) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row as u16));
        }
    }

    fn draw_confirm_song_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Song").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}'?", confirm.song.title)),
            Line::from("Are you sure?"),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn move_selection(&mut self, offset: isize, len: usize) {
        self.selected = offset_selection(self.selected, offset, len);
    }

    /// Put the cursor on `id` if it is visible in the current view.
    fn select_song(&mut self, id: i64) {
        if let Some(index) = self.list.view().iter().position(|song| song.id == id) {
            self.selected = index;
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::clock::Clock;
    use crate::db::MemoryBlobStore;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    #[derive(Default)]
    struct Recorder {
        current: Option<String>,
    }

    impl PlaybackSurface for Recorder {
        fn load(&mut self, embed_url: &str) -> Result<()> {
            self.current = Some(embed_url.to_string());
            Ok(())
        }

        fn current(&self) -> Option<&str> {
            self.current.as_deref()
        }
    }

    fn app() -> App {
        let list = SongList::load(
            Box::new(MemoryBlobStore::new()),
            Box::new(FixedClock(1_000)),
            "songs",
        );
        App::new(list, Box::new(Recorder::default()))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn add_song(app: &mut App, title: &str, url: &str, rating: &str) {
        app.handle_key(KeyCode::Char('+'));
        type_text(app, title);
        app.handle_key(KeyCode::Tab);
        type_text(app, url);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Backspace);
        type_text(app, rating);
        app.handle_key(KeyCode::Enter);
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn adding_through_the_form_creates_a_song() {
        let mut app = app();
        add_song(&mut app, "Song A", "https://youtu.be/dQw4w9WgXcQ", "7");
        let songs = app.list().songs();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Song A");
        assert_eq!(songs[0].rating, Some(7));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn invalid_form_stays_open() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+'));
        type_text(&mut app, "Only a title");
        app.handle_key(KeyCode::Enter);
        assert!(app.list().songs().is_empty());
        match &app.mode {
            Mode::EditingForm(form) => assert_eq!(form.title, "Only a title"),
            _ => panic!("form should stay open"),
        }
    }

    #[test]
    fn enter_plays_the_selected_video() {
        let mut app = app();
        add_song(&mut app, "Song A", "https://youtu.be/dQw4w9WgXcQ", "7");
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            app.player.current(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        add_song(&mut app, "Song A", "https://example.com", "3");

        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.list().songs().len(), 1);

        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('y'));
        assert!(app.list().songs().is_empty());
    }

    #[test]
    fn edit_keeps_identity() {
        let mut app = app();
        add_song(&mut app, "Song A", "https://example.com", "3");
        let before = app.list().songs()[0].clone();

        app.handle_key(KeyCode::Char('e'));
        type_text(&mut app, "!");
        app.handle_key(KeyCode::Enter);

        let after = &app.list().songs()[0];
        assert_eq!(after.title, "Song A!");
        assert_eq!(after.id, before.id);
        assert_eq!(after.date_added, before.date_added);
        assert_eq!(app.list().form_mode(), FormMode::Creating);
    }

    #[test]
    fn search_narrows_while_typing() {
        let mut app = app();
        add_song(&mut app, "Alpha", "https://example.com/a", "1");
        add_song(&mut app, "Beta", "https://example.com/b", "2");

        app.handle_key(KeyCode::Char('f'));
        type_text(&mut app, "be");
        assert_eq!(app.list().view().len(), 1);
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.list().view().len(), 2);
    }

    #[test]
    fn escape_clears_a_kept_search_but_never_quits() {
        let mut app = app();
        add_song(&mut app, "Alpha", "https://example.com/a", "1");
        add_song(&mut app, "Beta", "https://example.com/b", "2");

        assert!(!app.handle_key(KeyCode::Esc));

        app.handle_key(KeyCode::Char('f'));
        type_text(&mut app, "al");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.list().view().len(), 1);

        assert!(!app.handle_key(KeyCode::Esc));
        assert_eq!(app.list().view().len(), 2);
        assert!(!app.handle_key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn renders_both_layouts() {
        let mut app = app();
        assert!(screen_text(&app).contains("No songs yet"));

        add_song(&mut app, "Song A", "https://youtu.be/dQw4w9WgXcQ", "7");
        let table = screen_text(&app);
        assert!(table.contains("Song A"));
        assert!(table.contains("Cards View"));

        app.handle_key(KeyCode::Char('v'));
        let cards = screen_text(&app);
        assert!(cards.contains("Rating: 7"));
        assert!(cards.contains("Table View"));
    }
}
