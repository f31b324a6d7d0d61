//! Application state and logic

use std::time::{Duration, Instant};

use uuid::Uuid;

use favsites_core::error::validate;
use favsites_core::{Bookmark, Pager, PreviewLookup, Store, StoreError, ValidationError};

/// Cards per row in the grid
pub const GRID_COLUMNS: usize = 4;

/// How long status messages stay visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The name input
    Name,
    /// The link input
    Link,
    /// The card grid
    Grid,
}

impl Focus {
    /// Move to the next widget (wrapping)
    pub fn next(self) -> Self {
        match self {
            Focus::Name => Focus::Link,
            Focus::Link => Focus::Grid,
            Focus::Grid => Focus::Name,
        }
    }

    /// Move to the previous widget (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Focus::Name => Focus::Grid,
            Focus::Link => Focus::Name,
            Focus::Grid => Focus::Link,
        }
    }
}

/// Two-phase delete state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// No delete pending
    Idle,
    /// Waiting for the user to confirm deleting this bookmark
    Pending(Uuid),
}

/// Contents of the add/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub name: String,
    pub link: String,
    /// Set while editing an existing bookmark
    pub edit_id: Option<Uuid>,
}

impl Form {
    pub fn is_editing(&self) -> bool {
        self.edit_id.is_some()
    }

    fn clear(&mut self) {
        self.name.clear();
        self.link.clear();
        self.edit_id = None;
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Which widget has focus
    pub focus: Focus,
    /// Add/edit form
    pub form: Form,
    /// Cursor position (in chars) within the focused input
    pub cursor: usize,
    /// Current page of the grid
    pub pager: Pager,
    /// Selected card, as an offset into the current page
    pub selected: usize,
    /// Pending delete confirmation
    pub confirmation: Confirmation,
    /// Blocking notice shown in a modal until dismissed
    pub notice: Option<String>,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether a preview lookup is in flight
    pub is_loading: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    /// Create the app on page 1 with an empty form
    pub fn new(store: &Store) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Name,
            form: Form::default(),
            cursor: 0,
            pager: Pager::new(store.config().page_size),
            selected: 0,
            confirmation: Confirmation::Idle,
            notice: None,
            status_message: None,
            status_message_time: None,
            is_loading: false,
            show_help: false,
        }
    }

    /// Label of the form's submit button
    pub fn submit_label(&self) -> &'static str {
        if self.form.is_editing() {
            "Edit"
        } else {
            "Add"
        }
    }

    // ==================== Messages ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn has_notice(&self) -> bool {
        self.notice.is_some()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Grid ====================

    /// Bookmarks on the current page
    pub fn page<'a>(&self, store: &'a Store) -> &'a [Bookmark] {
        self.pager.slice(store.bookmarks())
    }

    /// The selected card, if the page has one
    pub fn current_bookmark<'a>(&self, store: &'a Store) -> Option<&'a Bookmark> {
        self.page(store).get(self.selected)
    }

    pub fn next_page(&mut self, store: &Store) {
        if self.pager.next(store.len()) {
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.pager.prev() {
            self.selected = 0;
        }
    }

    pub fn move_left(&mut self) {
        if self.selected % GRID_COLUMNS > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_right(&mut self, store: &Store) {
        let on_page = self.page(store).len();
        if self.selected % GRID_COLUMNS < GRID_COLUMNS - 1 && self.selected + 1 < on_page {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= GRID_COLUMNS {
            self.selected -= GRID_COLUMNS;
        }
    }

    pub fn move_down(&mut self, store: &Store) {
        let on_page = self.page(store).len();
        if self.selected + GRID_COLUMNS < on_page {
            self.selected += GRID_COLUMNS;
        }
    }

    /// Keep the page and selection valid after the collection shrank
    fn clamp_to(&mut self, store: &Store) {
        self.pager.clamp(store.len());
        let on_page = self.page(store).len();
        self.selected = self.selected.min(on_page.saturating_sub(1));
    }

    /// Open the selected bookmark in the system browser
    pub fn open_current(&mut self, store: &Store) {
        let Some(bookmark) = self.current_bookmark(store) else {
            return;
        };
        let (link, name) = (bookmark.link.clone(), bookmark.name.clone());
        match open::that_detached(&link) {
            Ok(()) => self.set_status(format!("Opened '{}'", name)),
            Err(e) => self.set_status(format!("Failed to open: {}", e)),
        }
    }

    // ==================== Form ====================

    /// Move focus to a form input with the cursor at the end
    pub fn focus_input(&mut self, focus: Focus) {
        self.focus = focus;
        self.cursor = self.focused_text().map_or(0, |s| s.chars().count());
    }

    /// Fill the form with `bookmark` and switch to edit mode
    pub fn begin_edit(&mut self, bookmark: &Bookmark) {
        self.form.name = bookmark.name.clone();
        self.form.link = bookmark.link.clone();
        self.form.edit_id = Some(bookmark.id);
        self.focus_input(Focus::Name);
    }

    /// Leave edit mode and clear the form
    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.cursor = 0;
    }

    /// Whether the form would pass validation
    pub fn form_is_valid(&self) -> bool {
        validate(&self.form.name, &self.form.link).is_ok()
    }

    /// Submit the form: edit when `edit_id` is set, add otherwise
    ///
    /// Returns true if the collection changed. On success the form and edit
    /// mode are cleared; on failure the form is left as typed.
    pub async fn submit<L>(&mut self, store: &mut Store, lookup: &L) -> bool
    where
        L: PreviewLookup + ?Sized,
    {
        if validate(&self.form.name, &self.form.link).is_err() {
            // The form asks for both fields together
            self.set_notice(ValidationError::MissingNameAndLink.to_string());
            return false;
        }

        let result = match self.form.edit_id {
            Some(id) => store.edit(id, &self.form.name, &self.form.link, lookup).await,
            None => store.add(&self.form.name, &self.form.link, lookup).await,
        };

        match result {
            Ok(bookmark) => {
                let verb = if self.form.is_editing() { "Updated" } else { "Added" };
                let preview = if bookmark.has_image() { "" } else { " (no preview)" };
                self.set_status(format!("{} '{}'{}", verb, bookmark.name, preview));
                self.cancel_edit();
                self.focus_input(Focus::Name);
                true
            }
            Err(StoreError::NotFound(_)) => {
                self.cancel_edit();
                self.set_notice("This item no longer exists");
                false
            }
            Err(e) => {
                self.set_notice(failure_notice("save", &e));
                false
            }
        }
    }

    // ==================== Text input ====================

    fn focused_text(&self) -> Option<&String> {
        match self.focus {
            Focus::Name => Some(&self.form.name),
            Focus::Link => Some(&self.form.link),
            Focus::Grid => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Name => Some(&mut self.form.name),
            Focus::Link => Some(&mut self.form.link),
            Focus::Grid => None,
        }
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.focused_text_mut() {
            let at = byte_index(text, cursor);
            text.insert(at, c);
            self.cursor += 1;
        }
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        if let Some(text) = self.focused_text_mut() {
            let at = byte_index(text, cursor - 1);
            text.remove(at);
            self.cursor -= 1;
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let len = self.focused_text().map_or(0, |s| s.chars().count());
        if self.cursor < len {
            self.cursor += 1;
        }
    }

    // ==================== Delete confirmation ====================

    /// Record a delete intent; replaces any pending one
    pub fn request_delete(&mut self, id: Uuid) {
        self.confirmation = Confirmation::Pending(id);
    }

    /// Delete the pending bookmark
    pub fn confirm_delete(&mut self, store: &mut Store) {
        let Confirmation::Pending(id) = self.confirmation else {
            return;
        };
        self.confirmation = Confirmation::Idle;

        match store.delete(id) {
            Ok(removed) => {
                if self.form.edit_id == Some(id) {
                    self.cancel_edit();
                }
                self.clamp_to(store);
                self.set_status(format!("Deleted '{}'", removed.name));
            }
            Err(e) => self.set_notice(failure_notice("delete", &e)),
        }
    }

    /// Drop the pending delete
    pub fn cancel_delete(&mut self) {
        self.confirmation = Confirmation::Idle;
    }
}

/// Notice text for a failed mutation, with a hint for storage problems
fn failure_notice(action: &str, err: &StoreError) -> String {
    match err {
        StoreError::Storage(storage) => match storage.recovery_suggestion() {
            Some(hint) => format!("Failed to {}: {}\n{}", action, err, hint),
            None => format!("Failed to {}: {}", action, err),
        },
        _ => format!("Failed to {}: {}", action, err),
    }
}

/// Byte offset of the `char_index`-th character
fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(i, _)| i)
}
