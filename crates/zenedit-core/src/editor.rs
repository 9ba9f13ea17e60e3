//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` acts as a facade, providing a simple interface to
//! complex subsystems. External code only needs to interact with
//! `Editor`, not individual components.

use std::path::{Path, PathBuf};
use std::time::Duration;

use zenedit_buffer::TextStats;
use zenedit_buffer::search as text_search;
use zenedit_buffer::transform;

use crate::document::Document;
use crate::event::{EditorEvent, EventBus};
use crate::prompt::{PathPurpose, Prompter, UnsavedChoice};
use crate::search::{SearchOutcome, SearchSession};
use crate::settings::{self, Color, ColorTarget, Settings, SettingsError, SettingsStore};
use crate::view::{AlignedSpan, Alignment, SurfaceStyle, TextBlink, ViewState};
use crate::{CoreError, CoreResult};

/// Autosave target used while the document has no file.
pub const AUTOSAVE_FILE_NAME: &str = "default_autosave.txt";

/// Shown by the About command.
pub const ABOUT: &str = concat!(
    "ZenEdit v",
    env!("CARGO_PKG_VERSION"),
    "\nA simple distraction-free text editor."
);

/// Image formats the background can show.
const BACKGROUND_IMAGE_EXTENSIONS: [&str; 2] = ["png", "gif"];

/// Files the editor reads and writes besides the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorPaths {
    pub settings_file: PathBuf,
    pub autosave_file: PathBuf,
}

impl EditorPaths {
    /// Both files inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings_file: dir.join(settings::SETTINGS_FILE_NAME),
            autosave_file: dir.join(AUTOSAVE_FILE_NAME),
        }
    }

    /// Uses the overrides where given, the config directory otherwise.
    pub fn resolve(
        settings_file: Option<PathBuf>,
        autosave_file: Option<PathBuf>,
    ) -> Result<Self, SettingsError> {
        let default_dir = match (&settings_file, &autosave_file) {
            (Some(_), Some(_)) => None,
            _ => Some(settings::config_dir()?),
        };
        let in_default_dir = |name: &str| {
            default_dir
                .as_ref()
                .map(|dir| dir.join(name))
                .unwrap_or_default()
        };
        Ok(Self {
            settings_file: settings_file
                .unwrap_or_else(|| in_default_dir(settings::SETTINGS_FILE_NAME)),
            autosave_file: autosave_file.unwrap_or_else(|| in_default_dir(AUTOSAVE_FILE_NAME)),
        })
    }
}

/// The main editor state.
///
/// ## Thread Safety
///
/// `Editor` is designed to be owned by a single thread (the UI loop).
/// Timers communicate with it via channels and never hold a reference.
pub struct Editor {
    /// The one open document
    document: Document,

    /// Persisted settings
    settings: SettingsStore,

    /// Session-only toggles
    view: ViewState,

    /// Open search, if any
    search: Option<SearchSession>,

    /// Clipboard content
    clipboard: String,

    paths: EditorPaths,

    /// Event bus for notifications
    event_bus: EventBus,

    /// Whether the editor should quit
    should_quit: bool,
}

impl Editor {
    /// Creates an editor around already loaded settings.
    pub fn new(settings: SettingsStore, paths: EditorPaths) -> Self {
        Self {
            document: Document::new(),
            settings,
            view: ViewState::default(),
            search: None,
            clipboard: String::new(),
            paths,
            event_bus: EventBus::new(),
            should_quit: false,
        }
    }

    /// Loads settings from `paths` and creates the editor.
    ///
    /// An unusable settings file is not fatal: the defaults are used and
    /// the error is handed back so the surface can tell the user.
    pub fn start(paths: EditorPaths) -> (Self, Option<SettingsError>) {
        let (store, err) = SettingsStore::load_or_defaults(&paths.settings_file);
        (Self::new(store, paths), err)
    }

    // ==================== Getters ====================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn paths(&self) -> &EditorPaths {
        &self.paths
    }

    pub fn search(&self) -> Option<&SearchSession> {
        self.search.as_ref()
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Window title: the file name, starred while modified.
    pub fn title(&self) -> String {
        let star = if self.document.is_modified() { "*" } else { "" };
        match self.document.path() {
            Some(_) => format!("ZenEdit - {}{star}", self.document.name()),
            None if star.is_empty() => "ZenEdit".to_string(),
            None => format!("ZenEdit - {}{star}", self.document.name()),
        }
    }

    pub fn surface_style(&self) -> SurfaceStyle {
        SurfaceStyle::resolve(self.settings(), &self.view)
    }

    /// Returns true if the editor should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ==================== File Operations ====================

    /// Replaces the document with an empty one.
    ///
    /// Unsaved changes are offered for saving first. Returns false when the
    /// user cancelled or the save did not happen; the text is kept then.
    pub fn new_document(&mut self, prompter: &mut dyn Prompter) -> CoreResult<bool> {
        if !self.confirm_discard(prompter, "creating a new file")? {
            return Ok(false);
        }
        self.replace_document(Document::new());
        self.emit(EditorEvent::DocumentCleared);
        Ok(true)
    }

    /// Loads a file into the editor.
    ///
    /// On failure the current document is untouched.
    pub fn open_document(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let doc = Document::open(path)?;
        tracing::info!("Opened {}", path.display());
        self.replace_document(doc);
        self.emit(EditorEvent::DocumentOpened(path.to_path_buf()));
        Ok(())
    }

    /// Saves to `path`, else to the bound path, else to a prompted path.
    ///
    /// Returns the path written, or `None` when the prompt was cancelled.
    pub fn save(
        &mut self,
        path: Option<PathBuf>,
        prompter: &mut dyn Prompter,
    ) -> CoreResult<Option<PathBuf>> {
        let target = path
            .or_else(|| self.document.path().map(Path::to_path_buf))
            .or_else(|| prompter.ask_path(PathPurpose::Save));
        match target {
            Some(target) => self.save_to(target).map(Some),
            None => Ok(None),
        }
    }

    /// Saves to `path`, or to a prompted path even if one is bound.
    pub fn save_as(
        &mut self,
        path: Option<PathBuf>,
        prompter: &mut dyn Prompter,
    ) -> CoreResult<Option<PathBuf>> {
        match path.or_else(|| prompter.ask_path(PathPurpose::Save)) {
            Some(target) => self.save_to(target).map(Some),
            None => Ok(None),
        }
    }

    fn save_to(&mut self, target: PathBuf) -> CoreResult<PathBuf> {
        self.document.save_to(&target)?;
        tracing::info!("Saved {}", target.display());
        self.emit(EditorEvent::DocumentSaved(target.clone()));
        Ok(target)
    }

    /// Asks to exit. Returns true if the editor should now close.
    pub fn quit(&mut self, prompter: &mut dyn Prompter) -> CoreResult<bool> {
        if !self.confirm_discard(prompter, "exiting")? {
            return Ok(false);
        }
        self.should_quit = true;
        self.emit(EditorEvent::Quit);
        Ok(true)
    }

    /// Writes a snapshot if autosave is on.
    ///
    /// Goes to the bound path, or the fallback file while untitled. The
    /// modified flag is left alone. Returns the path written.
    pub fn autosave(&mut self) -> CoreResult<Option<PathBuf>> {
        if !self.settings().auto_save_enabled {
            return Ok(None);
        }
        let target = self
            .document
            .path()
            .map_or_else(|| self.paths.autosave_file.clone(), Path::to_path_buf);
        self.document.write_snapshot(&target)?;
        tracing::debug!("Autosaved to {}", target.display());
        self.emit(EditorEvent::Autosaved(target.clone()));
        Ok(Some(target))
    }

    /// Returns true when it is fine to drop the current text.
    fn confirm_discard(&mut self, prompter: &mut dyn Prompter, action: &str) -> CoreResult<bool> {
        if !self.document.is_modified() {
            return Ok(true);
        }
        match prompter.confirm_unsaved(action) {
            UnsavedChoice::Cancel => Ok(false),
            UnsavedChoice::Discard => Ok(true),
            UnsavedChoice::Save => Ok(self.save(None, prompter)?.is_some()),
        }
    }

    fn replace_document(&mut self, doc: Document) {
        self.document = doc;
        self.search = None;
        self.view.alignment = None;
    }

    // ==================== Text Editing ====================

    /// Inserts text at the caret, replacing any selection.
    pub fn insert_text(&mut self, text: &str) -> CoreResult<()> {
        self.document.insert_at_cursor(text)?;
        self.text_changed();
        Ok(())
    }

    /// Undoes the last edit group. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let undone = self.document.undo();
        if undone {
            self.text_changed();
        }
        undone
    }

    /// Redoes the last undone edit group. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        let redone = self.document.redo();
        if redone {
            self.text_changed();
        }
        redone
    }

    // ==================== Selection ====================

    /// Selects all text.
    pub fn select_all(&mut self) {
        self.document.select_all();
        self.emit(EditorEvent::SelectionChanged);
    }

    /// Moves the caret to a character offset.
    pub fn move_caret(&mut self, offset: usize) {
        self.document.move_caret(offset);
        self.emit(EditorEvent::SelectionChanged);
    }

    /// Copies selection to clipboard. Returns false with nothing selected.
    pub fn copy(&mut self) -> bool {
        match self.document.selected_text() {
            Some(text) => {
                self.clipboard = text;
                true
            }
            None => false,
        }
    }

    /// Cuts selection to clipboard.
    pub fn cut(&mut self) -> CoreResult<bool> {
        match self.document.delete_selection()? {
            Some(text) => {
                self.clipboard = text;
                self.text_changed();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pastes from clipboard.
    pub fn paste(&mut self) -> CoreResult<()> {
        if self.clipboard.is_empty() {
            return Ok(());
        }
        let text = self.clipboard.clone();
        self.insert_text(&text)
    }

    // ==================== Search & Transform ====================

    /// Starts a new search from the top of the document.
    pub fn find(&mut self, query: &str, case_sensitive: bool) -> SearchOutcome {
        let mut session = SearchSession::new(query, case_sensitive);
        let outcome = session.find(&mut self.document);
        self.search = Some(session);
        if outcome.matched().is_some() {
            self.emit(EditorEvent::SelectionChanged);
        }
        outcome
    }

    /// Continues the open search. Without one, nothing is found.
    pub fn find_next(&mut self) -> SearchOutcome {
        let Some(session) = self.search.as_mut() else {
            return SearchOutcome::NotFound;
        };
        let outcome = session.find_next(&mut self.document);
        if outcome.matched().is_some() {
            self.emit(EditorEvent::SelectionChanged);
        }
        outcome
    }

    /// Ends the search, leaving its last match selected.
    pub fn close_search(&mut self) {
        if let Some(session) = self.search.take() {
            session.close(&mut self.document);
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    /// Replaces every occurrence as one undo step. Returns the count.
    pub fn replace_all(&mut self, query: &str, replacement: &str, case_sensitive: bool) -> CoreResult<usize> {
        let replaced = text_search::replace_all(&self.document.text(), query, replacement, case_sensitive);
        if replaced.count > 0 {
            self.document.replace_text(&replaced.text)?;
            self.text_changed();
        }
        tracing::debug!("Replaced {} occurrence(s) of {:?}", replaced.count, query);
        Ok(replaced.count)
    }

    /// Selects line `line` (1-based). Out of range is a no-op returning false.
    pub fn goto_line(&mut self, line: usize) -> bool {
        let moved = self.document.goto_line(line);
        if moved {
            self.emit(EditorEvent::SelectionChanged);
        }
        moved
    }

    /// Adds or strips `<n>. ` line prefixes.
    pub fn toggle_line_numbers(&mut self) -> CoreResult<()> {
        let toggled = transform::toggle_line_numbers(&self.document.text());
        self.document.replace_text(&toggled)?;
        self.text_changed();
        Ok(())
    }

    pub fn text_stats(&self) -> TextStats {
        transform::stats(&self.document.text())
    }

    // ==================== Settings ====================

    /// Sets one setting from its textual form.
    pub fn set_setting(&mut self, key: &str, value: &str) -> CoreResult<()> {
        let result = self.settings.update(key, value);
        self.after_settings_change(result)
    }

    fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) -> CoreResult<()> {
        let result = self.settings.update_with(change);
        self.after_settings_change(result)
    }

    /// Emits the change unless the value was rejected outright.
    fn after_settings_change(&mut self, result: Result<(), SettingsError>) -> CoreResult<()> {
        match result {
            Err(e @ SettingsError::InvalidValue { .. }) => Err(e.into()),
            result => {
                self.emit(EditorEvent::SettingsChanged);
                result.inspect_err(|e| tracing::warn!("{}", e)).map_err(Into::into)
            }
        }
    }

    pub fn set_font(&mut self, family: &str, size: u32, bold: bool, italic: bool) -> CoreResult<()> {
        let family = family.trim();
        if family.is_empty() {
            return Err(CoreError::invalid("font family can't be empty"));
        }
        ensure_positive("font size", size)?;
        let family = family.to_string();
        self.update_settings(|s| {
            s.font_family = family;
            s.font_size = size;
            s.font_bold = bold;
            s.font_italic = italic;
        })
    }

    pub fn set_font_size(&mut self, size: u32) -> CoreResult<()> {
        ensure_positive("font size", size)?;
        self.update_settings(|s| s.font_size = size)
    }

    pub fn set_line_spacing(&mut self, spacing: f64) -> CoreResult<()> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(CoreError::invalid("line spacing must be a positive number"));
        }
        self.update_settings(|s| s.line_spacing = spacing)
    }

    pub fn set_padding(&mut self, padding: u32) -> CoreResult<()> {
        self.update_settings(|s| s.padding = padding)
    }

    pub fn set_border_thickness(&mut self, thickness: u32) -> CoreResult<()> {
        self.update_settings(|s| s.border_thickness = thickness)
    }

    pub fn set_caret_thickness(&mut self, width: u32) -> CoreResult<()> {
        ensure_positive("caret thickness", width)?;
        self.update_settings(|s| s.insertwidth = width)
    }

    pub fn set_text_area_size(&mut self, width: u32, height: u32) -> CoreResult<()> {
        ensure_positive("width", width)?;
        ensure_positive("height", height)?;
        self.update_settings(|s| {
            s.text_width = width;
            s.text_height = height;
        })
    }

    pub fn set_color(&mut self, target: ColorTarget, color: Color) -> CoreResult<()> {
        self.update_settings(|s| *target.slot(s) = color)
    }

    /// Flips autosave and returns the new state.
    pub fn toggle_auto_save(&mut self) -> CoreResult<bool> {
        let enabled = !self.settings().auto_save_enabled;
        self.update_settings(|s| s.auto_save_enabled = enabled)?;
        Ok(enabled)
    }

    pub fn set_auto_save_interval(&mut self, ms: u64) -> CoreResult<()> {
        if ms == 0 {
            return Err(CoreError::invalid("autosave interval must be positive"));
        }
        self.update_settings(|s| s.auto_save_interval_ms = ms)
    }

    pub fn auto_save_interval(&self) -> Option<Duration> {
        let settings = self.settings();
        settings
            .auto_save_enabled
            .then(|| Duration::from_millis(settings.auto_save_interval_ms))
    }

    /// Restores every setting to its default.
    pub fn reset_theme(&mut self) -> CoreResult<()> {
        let result = self.settings.reset_to_defaults().map(|_| ());
        self.after_settings_change(result)
    }

    // ==================== View ====================

    fn update_view(&mut self, change: impl FnOnce(&mut ViewState)) {
        change(&mut self.view);
        self.emit(EditorEvent::ViewChanged);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.update_view(ViewState::toggle_fullscreen);
    }

    /// Flips the menu. Returns false while fullscreen, where it is ignored.
    pub fn toggle_menu(&mut self) -> bool {
        let applied = self.view.toggle_menu();
        if applied {
            self.emit(EditorEvent::ViewChanged);
        }
        applied
    }

    pub fn toggle_border(&mut self) {
        self.update_view(|v| v.border_visible = !v.border_visible);
    }

    pub fn toggle_caret(&mut self) {
        self.update_view(|v| v.caret_visible = !v.caret_visible);
    }

    pub fn toggle_caret_blink(&mut self) {
        self.update_view(ViewState::toggle_caret_blink);
    }

    pub fn set_caret_blink_speed(&mut self, ms: u64) {
        self.update_view(|v| v.set_caret_blink_speed(ms));
    }

    pub fn toggle_mouse_cursor(&mut self) {
        self.update_view(|v| v.mouse_cursor_visible = !v.mouse_cursor_visible);
    }

    /// Starts blinking the text every `ms` milliseconds.
    pub fn start_text_blink(&mut self, ms: u64) -> CoreResult<()> {
        if ms == 0 {
            return Err(CoreError::invalid("blink speed must be positive"));
        }
        self.update_view(|v| {
            v.text_blink = Some(TextBlink {
                period: Duration::from_millis(ms),
                hidden: false,
            })
        });
        Ok(())
    }

    pub fn stop_text_blink(&mut self) {
        self.update_view(|v| v.text_blink = None);
    }

    /// Period of the running text blink, if any.
    pub fn text_blink_period(&self) -> Option<Duration> {
        self.view.text_blink.map(|b| b.period)
    }

    /// Advances the text blink. Returns false if blinking is off.
    pub fn blink_tick(&mut self) -> bool {
        let ticked = self.view.blink_tick();
        if ticked {
            self.emit(EditorEvent::ViewChanged);
        }
        ticked
    }

    /// Shows an image behind the text area. It must be an existing PNG or
    /// GIF file.
    pub fn set_background_image(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| BACKGROUND_IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if !supported {
            return Err(CoreError::invalid(
                "unsupported image format, please select a PNG or GIF file",
            ));
        }
        if !path.is_file() {
            return Err(CoreError::invalid(format!("no image at {}", path.display())));
        }
        let path = path.to_path_buf();
        self.update_view(|v| v.background_image = Some(path));
        Ok(())
    }

    pub fn clear_background_image(&mut self) {
        self.update_view(|v| v.background_image = None);
    }

    /// Aligns the selection, or the whole document when nothing is
    /// selected. Replaces any earlier alignment.
    pub fn align(&mut self, alignment: Alignment) {
        let range = self
            .document
            .cursor()
            .selection()
            .unwrap_or(0..self.document.buffer().len_chars());
        self.update_view(|v| v.alignment = Some(AlignedSpan { alignment, range }));
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }

    /// Any open search holds offsets into the old text, so it ends here.
    fn text_changed(&mut self) {
        self.search = None;
        self.emit(EditorEvent::DocumentChanged);
    }
}

fn ensure_positive(what: &str, value: u32) -> CoreResult<()> {
    if value == 0 {
        return Err(CoreError::invalid(format!("{what} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentState;
    use crate::prompt::{Answer, ScriptedPrompter};

    fn editor(dir: &tempfile::TempDir) -> Editor {
        let paths = EditorPaths::in_dir(dir.path());
        let (editor, err) = Editor::start(paths);
        assert!(err.is_none());
        editor
    }

    fn no_prompts() -> ScriptedPrompter {
        ScriptedPrompter::default()
    }

    #[test]
    fn test_new_editor_is_untitled() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);
        assert_eq!(editor.document().state(), DocumentState::UntitledUnmodified);
        assert_eq!(editor.title(), "ZenEdit");
        assert!(!editor.should_quit());
    }

    #[test]
    fn test_new_document_discard() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("draft").unwrap();

        let mut prompter = ScriptedPrompter::new([Answer::Choice(UnsavedChoice::Discard)]);
        assert!(editor.new_document(&mut prompter).unwrap());
        assert_eq!(editor.document().state(), DocumentState::UntitledUnmodified);
        assert_eq!(editor.document().text(), "");
    }

    #[test]
    fn test_new_document_cancel_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("draft").unwrap();

        let mut prompter = ScriptedPrompter::new([Answer::Choice(UnsavedChoice::Cancel)]);
        assert!(!editor.new_document(&mut prompter).unwrap());
        assert_eq!(editor.document().text(), "draft");
        assert_eq!(editor.document().state(), DocumentState::UntitledModified);
    }

    #[test]
    fn test_new_document_save_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kept.txt");
        let mut editor = editor(&dir);
        editor.insert_text("keep me").unwrap();

        let mut prompter = ScriptedPrompter::new([
            Answer::Choice(UnsavedChoice::Save),
            Answer::Path(Some(path.clone())),
        ]);
        assert!(editor.new_document(&mut prompter).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
        assert_eq!(editor.document().state(), DocumentState::UntitledUnmodified);
    }

    #[test]
    fn test_new_document_failed_save_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("precious").unwrap();

        // Saving onto a directory fails
        let mut prompter = ScriptedPrompter::new([
            Answer::Choice(UnsavedChoice::Save),
            Answer::Path(Some(dir.path().to_path_buf())),
        ]);
        assert!(editor.new_document(&mut prompter).is_err());
        assert_eq!(editor.document().text(), "precious");
        assert!(editor.document().is_modified());

        // Cancelling the save dialog keeps it too
        let mut prompter = ScriptedPrompter::new([
            Answer::Choice(UnsavedChoice::Save),
            Answer::Path(None),
        ]);
        assert!(!editor.new_document(&mut prompter).unwrap());
        assert_eq!(editor.document().text(), "precious");
    }

    #[test]
    fn test_open_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "alpha\nbeta").unwrap();

        let mut editor = editor(&dir);
        editor.open_document(&path).unwrap();
        assert_eq!(editor.document().state(), DocumentState::BoundUnmodified(path.clone()));
        assert_eq!(editor.title(), "ZenEdit - notes.txt");

        editor.insert_text("> ").unwrap();
        assert_eq!(editor.title(), "ZenEdit - notes.txt*");

        let written = editor.save(None, &mut no_prompts()).unwrap();
        assert_eq!(written, Some(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "> alpha\nbeta");
        assert!(!editor.document().is_modified());
    }

    #[test]
    fn test_open_missing_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("stay").unwrap();

        let err = editor.open_document(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(editor.document().text(), "stay");
    }

    #[test]
    fn test_save_cancelled_prompt_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("x").unwrap();

        let mut prompter = ScriptedPrompter::new([Answer::Path(None)]);
        assert_eq!(editor.save(None, &mut prompter).unwrap(), None);
        assert_eq!(editor.document().state(), DocumentState::UntitledModified);
    }

    #[test]
    fn test_save_as_always_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        let mut editor = editor(&dir);
        editor.insert_text("body").unwrap();
        editor.save(Some(first.clone()), &mut no_prompts()).unwrap();

        let mut prompter = ScriptedPrompter::new([Answer::Path(Some(second.clone()))]);
        editor.save_as(None, &mut prompter).unwrap();
        assert_eq!(prompter.asked(), ["Save As"]);
        assert_eq!(editor.document().path(), Some(second.as_path()));
    }

    #[test]
    fn test_quit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("unsaved").unwrap();

        let mut cancel = ScriptedPrompter::new([Answer::Choice(UnsavedChoice::Cancel)]);
        assert!(!editor.quit(&mut cancel).unwrap());
        assert!(!editor.should_quit());

        let mut failed_save = ScriptedPrompter::new([
            Answer::Choice(UnsavedChoice::Save),
            Answer::Path(Some(dir.path().to_path_buf())),
        ]);
        assert!(editor.quit(&mut failed_save).is_err());
        assert!(!editor.should_quit());

        let mut discard = ScriptedPrompter::new([Answer::Choice(UnsavedChoice::Discard)]);
        assert!(editor.quit(&mut discard).unwrap());
        assert!(editor.should_quit());
    }

    #[test]
    fn test_quit_unmodified_does_not_ask() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut prompter = no_prompts();
        assert!(editor.quit(&mut prompter).unwrap());
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_autosave_untitled_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("draft").unwrap();

        let written = editor.autosave().unwrap();
        assert_eq!(written, Some(dir.path().join(AUTOSAVE_FILE_NAME)));
        assert_eq!(std::fs::read_to_string(dir.path().join(AUTOSAVE_FILE_NAME)).unwrap(), "draft");
        assert!(editor.document().is_modified());
    }

    #[test]
    fn test_autosave_bound_and_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bound.txt");
        let mut editor = editor(&dir);
        editor.save(Some(path.clone()), &mut no_prompts()).unwrap();
        editor.insert_text("more").unwrap();

        assert_eq!(editor.autosave().unwrap(), Some(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "more");
        assert_eq!(editor.document().state(), DocumentState::BoundModified(path));

        assert!(!editor.toggle_auto_save().unwrap());
        assert_eq!(editor.autosave().unwrap(), None);
        assert_eq!(editor.auto_save_interval(), None);
    }

    #[test]
    fn test_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("cut this").unwrap();
        assert!(!editor.copy());

        editor.select_all();
        assert!(editor.copy());
        assert!(editor.cut().unwrap());
        assert_eq!(editor.document().text(), "");

        editor.paste().unwrap();
        editor.paste().unwrap();
        assert_eq!(editor.document().text(), "cut thiscut this");
        assert_eq!(editor.clipboard(), "cut this");
    }

    #[test]
    fn test_replace_all_is_one_undo_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.txt");
        std::fs::write(&path, "cat Cat cat").unwrap();
        let mut editor = editor(&dir);
        editor.open_document(&path).unwrap();

        assert_eq!(editor.replace_all("dog", "x", false).unwrap(), 0);
        assert!(!editor.document().is_modified());

        assert_eq!(editor.replace_all("cat", "dog", false).unwrap(), 3);
        assert_eq!(editor.document().text(), "dog dog dog");
        assert!(editor.document().is_modified());

        assert!(editor.undo());
        assert_eq!(editor.document().text(), "cat Cat cat");
    }

    #[test]
    fn test_find_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("a b a").unwrap();

        assert!(matches!(editor.find("a", true), SearchOutcome::Found(_)));
        assert!(matches!(editor.find_next(), SearchOutcome::Found(_)));
        assert!(matches!(editor.find_next(), SearchOutcome::Wrapped(_)));
        editor.close_search();
        assert!(editor.search().is_none());
        assert_eq!(editor.document().cursor().selection(), Some(0..1));
    }

    #[test]
    fn test_edits_end_open_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("x a a").unwrap();
        assert!(matches!(editor.find("a", true), SearchOutcome::Found(_)));

        editor.move_caret(0);
        editor.insert_text("zz").unwrap();
        assert!(editor.search().is_none());
        assert!(matches!(editor.find_next(), SearchOutcome::NotFound));

        assert!(matches!(editor.find("a", true), SearchOutcome::Found(_)));
        assert!(editor.undo());
        assert!(editor.search().is_none());
        editor.close_search();
        assert_eq!(editor.document().text(), "x a a");
    }

    #[test]
    fn test_goto_line_and_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("one\ntwo\n").unwrap();

        assert!(editor.goto_line(2));
        assert_eq!(editor.document().selected_text().as_deref(), Some("two"));
        assert!(!editor.goto_line(3));

        editor.toggle_line_numbers().unwrap();
        assert_eq!(editor.document().text(), "1. one\n2. two\n3. ");
        editor.toggle_line_numbers().unwrap();
        assert_eq!(editor.document().text(), "one\ntwo\n");
    }

    #[test]
    fn test_text_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("hello world\n").unwrap();
        let stats = editor.text_stats();
        assert_eq!((stats.words, stats.characters), (2, 11));
    }

    #[test]
    fn test_appearance_changes_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);

        editor.set_font("Courier New", 14, true, false).unwrap();
        editor.set_text_area_size(640, 480).unwrap();
        editor
            .set_color(ColorTarget::Border, "#00ff00".parse().unwrap())
            .unwrap();

        let reloaded = SettingsStore::load(&editor.paths().settings_file).unwrap();
        let settings = reloaded.settings();
        assert_eq!(settings.font_family, "Courier New");
        assert!(settings.font_bold);
        assert_eq!((settings.text_width, settings.text_height), (640, 480));
        assert_eq!(settings.border_color, Color::rgb(0, 0xff, 0));
    }

    #[test]
    fn test_invalid_appearance_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);

        assert!(matches!(editor.set_font_size(0), Err(CoreError::InvalidInput(_))));
        assert!(editor.set_line_spacing(-1.0).is_err());
        assert!(editor.set_caret_thickness(0).is_err());
        assert!(editor.set_text_area_size(0, 10).is_err());
        assert!(editor.set_setting("font_size", "huge").is_err());
        assert_eq!(editor.settings(), &Settings::default());
    }

    #[test]
    fn test_reset_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.set_padding(12).unwrap();
        editor.reset_theme().unwrap();
        assert_eq!(editor.settings(), &Settings::default());
    }

    #[test]
    fn test_view_toggles_reach_surface_style() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);

        editor.toggle_border();
        editor.toggle_caret();
        editor.toggle_fullscreen();
        assert!(!editor.toggle_menu());

        let style = editor.surface_style();
        assert_eq!(style.border_thickness, 0);
        assert_eq!(style.caret_width, 0);
        assert!(!style.show_menu);
        assert_eq!(editor.settings().border_thickness, 1);
    }

    #[test]
    fn test_text_blink() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        assert!(editor.start_text_blink(0).is_err());
        assert!(!editor.blink_tick());

        editor.start_text_blink(500).unwrap();
        assert_eq!(editor.text_blink_period(), Some(Duration::from_millis(500)));
        assert!(editor.blink_tick());
        assert_eq!(editor.surface_style().text, editor.settings().bg_color);

        editor.stop_text_blink();
        assert_eq!(editor.text_blink_period(), None);
    }

    #[test]
    fn test_background_image_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);

        let jpg = dir.path().join("photo.jpg");
        std::fs::write(&jpg, b"x").unwrap();
        assert!(matches!(editor.set_background_image(&jpg), Err(CoreError::InvalidInput(_))));
        assert!(editor.set_background_image(dir.path().join("missing.png")).is_err());

        let png = dir.path().join("wall.PNG");
        std::fs::write(&png, b"x").unwrap();
        editor.set_background_image(&png).unwrap();
        assert_eq!(editor.view().background_image.as_deref(), Some(png.as_path()));
    }

    #[test]
    fn test_align_selection_or_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        editor.insert_text("left\nright").unwrap();

        editor.align(Alignment::Center);
        assert_eq!(editor.view().alignment.as_ref().map(|a| a.range.clone()), Some(0..10));

        editor.goto_line(2);
        editor.align(Alignment::Right);
        let span = editor.view().alignment.clone().unwrap();
        assert_eq!((span.alignment, span.range), (Alignment::Right, 5..10));
    }

    #[test]
    fn test_events_emitted() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut rx = editor.subscribe();

        editor.insert_text("x").unwrap();
        editor.set_padding(2).unwrap();
        editor.toggle_border();

        assert_eq!(rx.try_recv().unwrap(), EditorEvent::DocumentChanged);
        assert_eq!(rx.try_recv().unwrap(), EditorEvent::SettingsChanged);
        assert_eq!(rx.try_recv().unwrap(), EditorEvent::ViewChanged);
    }

    #[test]
    fn test_paths_resolve_overrides() {
        let paths = EditorPaths::resolve(Some("s.toml".into()), Some("a.txt".into())).unwrap();
        assert_eq!(paths.settings_file, PathBuf::from("s.toml"));
        assert_eq!(paths.autosave_file, PathBuf::from("a.txt"));
    }
}
