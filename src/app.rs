use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ratatui::text::Line;
use syntect::highlighting::Theme as SyntectTheme;
use syntect::parsing::SyntaxSet;
use tokio::sync::mpsc;

use crate::components::info_bar::EntryInfo;
use crate::components::preview::{highlight_text, load_theme};
use crate::config::AppConfig;
use crate::error::ListingError;
use crate::event::{DirChild, Event};
use crate::nav::controller::{NavOutcome, NavigationController};
use crate::nav::listing::ListingCache;
use crate::nav::preview::{PreviewContent, PreviewEngine, PreviewUpdate};
use crate::nav::resolver;
use crate::nav::suggest::Suggester;
use crate::theme::{resolve_theme, ThemeColors};
use crate::tree::{ExpandAction, TreeViewState};

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// The goto path editor is open.
    Goto,
}

/// State for the goto path editor.
#[derive(Debug, Default)]
pub struct GotoState {
    pub input: String,
    /// Byte position of the cursor within `input`.
    pub cursor: usize,
    /// Latest completion computed for `input`, if any.
    pub suggestion: Option<String>,
    /// Input serial; suggestion events carrying an older serial are stale.
    pub serial: u64,
    /// Whether `input` currently resolves to a directory.
    pub is_valid: bool,
}

impl GotoState {
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.input[..self.cursor]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.cursor -= prev.len_utf8();
            self.input.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            let prev = self.input[..self.cursor]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.len() {
            let next = self.input[self.cursor..]
                .chars()
                .next()
                .expect("cursor < len guarantees at least one char");
            self.cursor += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn cursor_at_end(&self) -> bool {
        self.cursor >= self.input.len()
    }
}

/// State for the preview panel.
pub struct PreviewState {
    #[allow(dead_code)]
    pub path: Option<PathBuf>,
    pub lines: Vec<Line<'static>>,
    pub total_lines: usize,
    pub scroll_offset: usize,
    /// When set, rendered centered instead of content lines.
    pub placeholder: Option<&'static str>,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            path: None,
            lines: Vec::new(),
            total_lines: 0,
            scroll_offset: 0,
            placeholder: Some("No preview"),
        }
    }
}

/// A transient status-line notice.
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    created: Instant,
}

/// Main application state.
pub struct App {
    pub controller: NavigationController,
    pub tree: TreeViewState,
    pub mode: AppMode,
    pub goto: GotoState,
    pub preview: PreviewState,
    pub entry_info: Option<EntryInfo>,
    pub stat_failed: bool,
    pub status_message: Option<StatusMessage>,
    pub should_quit: bool,
    pub theme: ThemeColors,
    suggester: Arc<Suggester>,
    events: mpsc::UnboundedSender<Event>,
    syntax_set: SyntaxSet,
    syntax_theme: SyntectTheme,
}

impl App {
    /// Create a new App rooted at `root`, which must already be resolved and
    /// validated. Requests the root listing immediately.
    pub fn new(root: PathBuf, config: &AppConfig, events: mpsc::UnboundedSender<Event>) -> Self {
        let cache = Arc::new(ListingCache::new());
        let previews = PreviewEngine::new(events.clone());
        let mut controller = NavigationController::new(
            root.clone(),
            Arc::clone(&cache),
            previews,
            events.clone(),
            config.listing_limit(),
        );
        if config.preview_visible() {
            controller.toggle_preview();
        }
        controller.request_listing(&root);

        let mut tree = TreeViewState::new(root);
        tree.show_hidden = config.show_hidden();

        Self {
            controller,
            tree,
            mode: AppMode::Normal,
            goto: GotoState::default(),
            preview: PreviewState::default(),
            entry_info: None,
            stat_failed: false,
            status_message: None,
            should_quit: false,
            theme: resolve_theme(&config.theme),
            suggester: Arc::new(Suggester::new(cache)),
            events,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            syntax_theme: load_theme(config.syntax_theme()),
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text,
            is_error,
            created: Instant::now(),
        });
    }

    /// Clear the status message once it has been displayed for a few seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some(ref msg) = self.status_message {
            if msg.created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    // ── Tree / highlight ─────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        self.tree.select_next();
        self.highlight_selected();
    }

    pub fn select_previous(&mut self) {
        self.tree.select_previous();
        self.highlight_selected();
    }

    pub fn select_first(&mut self) {
        self.tree.select_first();
        self.highlight_selected();
    }

    pub fn select_last(&mut self) {
        self.tree.select_last();
        self.highlight_selected();
    }

    pub fn expand_selected(&mut self) {
        if let ExpandAction::NeedsListing(path) = self.tree.expand_selected() {
            self.controller.request_listing(&path);
        }
    }

    pub fn collapse_selected(&mut self) {
        self.tree.collapse_selected();
        self.highlight_selected();
    }

    pub fn toggle_hidden(&mut self) {
        self.tree.toggle_hidden();
        self.highlight_selected();
    }

    /// Invalidate and re-fetch the selected directory (or the selection's
    /// parent for files), defaulting to the root.
    pub fn reload_selected(&mut self) {
        let target = self.tree.reload_target();
        let reloaded = self.controller.reload(target.as_deref());
        self.set_status_message(format!("Reloaded {}", reloaded.display()), false);
    }

    pub fn toggle_preview(&mut self) {
        self.controller.toggle_preview();
    }

    pub fn preview_scroll_down(&mut self) {
        if self.preview.scroll_offset + 1 < self.preview.total_lines {
            self.preview.scroll_offset += 1;
        }
    }

    pub fn preview_scroll_up(&mut self) {
        self.preview.scroll_offset = self.preview.scroll_offset.saturating_sub(1);
    }

    /// Push the selected entry to the preview engine and the info bar.
    fn highlight_selected(&mut self) {
        let Some(path) = self.tree.selected_path().map(PathBuf::from) else {
            return;
        };
        self.controller.highlight(path.clone());
        match EntryInfo::from_path(&path) {
            Ok(info) => {
                self.entry_info = Some(info);
                self.stat_failed = false;
            }
            Err(_) => {
                self.entry_info = None;
                self.stat_failed = true;
            }
        }
    }

    // ── Goto editor ──────────────────────────────────────────────────────────

    /// Open the goto editor pre-filled with the current root, normalized to
    /// end with a single separator.
    pub fn open_goto(&mut self) {
        let root = self.controller.root().display().to_string();
        let input = format!("{}/", root.trim_end_matches('/'));
        self.goto = GotoState {
            cursor: input.len(),
            input,
            suggestion: None,
            serial: self.goto.serial,
            is_valid: false,
        };
        self.mode = AppMode::Goto;
        self.refresh_goto();
    }

    pub fn cancel_goto(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Submit the typed path. Rejection leaves the current root untouched and
    /// surfaces a dismissible notice.
    pub fn submit_goto(&mut self) {
        self.mode = AppMode::Normal;
        let input = self.goto.input.clone();
        match self.controller.navigate_to(&input) {
            NavOutcome::RootChanged(root) => {
                let show_hidden = self.tree.show_hidden;
                self.tree.set_root(root);
                self.tree.show_hidden = show_hidden;
                self.preview = PreviewState::default();
                self.entry_info = None;
                self.stat_failed = false;
            }
            NavOutcome::Rejected { input, reason } => {
                self.set_status_message(format!("'{}' is {}", input, reason), true);
            }
        }
    }

    pub fn goto_insert_char(&mut self, c: char) {
        self.goto.insert_char(c);
        self.refresh_goto();
    }

    pub fn goto_backspace(&mut self) {
        self.goto.backspace();
        self.refresh_goto();
    }

    /// Replace the input with the pending suggestion, if any.
    pub fn goto_accept_suggestion(&mut self) {
        if let Some(suggestion) = self.goto.suggestion.take() {
            self.goto.input = suggestion;
            self.goto.cursor = self.goto.input.len();
            self.refresh_goto();
        }
    }

    /// Re-validate the input and kick off a completion for it.
    fn refresh_goto(&mut self) {
        self.goto.is_valid = resolver::resolve(&self.goto.input)
            .map(|p| resolver::is_directory(&p))
            .unwrap_or(false);

        self.goto.serial += 1;
        let serial = self.goto.serial;
        let input = self.goto.input.clone();
        let suggester = Arc::clone(&self.suggester);
        let events = self.events.clone();
        tokio::spawn(async move {
            let text = suggester.suggest(&input).await;
            let _ = events.send(Event::Suggestion { serial, text });
        });
    }

    // ── Async result application ─────────────────────────────────────────────

    /// Apply a finished directory listing to the tree.
    pub fn on_dir_listed(
        &mut self,
        parent: PathBuf,
        result: std::result::Result<Vec<DirChild>, ListingError>,
    ) {
        match result {
            Ok(children) => {
                self.tree.apply_children(&parent, &children);
                // First listing after startup: highlight the initial selection.
                if self.controller.highlighted().is_none() {
                    self.highlight_selected();
                }
            }
            Err(e) => {
                self.tree.apply_listing_failure(&parent);
                self.set_status_message(e.to_string(), true);
            }
        }
    }

    /// Apply a preview result, dropping superseded generations.
    pub fn on_preview(&mut self, update: PreviewUpdate) {
        if update.generation != self.controller.previews().current_generation() {
            return;
        }
        match update.content {
            PreviewContent::Text { text, syntax } => {
                let (lines, total) =
                    highlight_text(&text, &syntax, &self.syntax_set, &self.syntax_theme);
                self.preview = PreviewState {
                    path: Some(update.path),
                    lines,
                    total_lines: total,
                    scroll_offset: 0,
                    placeholder: None,
                };
            }
            PreviewContent::Binary | PreviewContent::Unavailable => {
                self.preview = PreviewState {
                    path: Some(update.path),
                    placeholder: Some("Preview not available"),
                    ..PreviewState::default()
                };
            }
            PreviewContent::NotFile => {
                self.preview = PreviewState {
                    path: Some(update.path),
                    ..PreviewState::default()
                };
            }
        }
    }

    /// Apply a completion result, dropping stale serials.
    pub fn on_suggestion(&mut self, serial: u64, text: Option<String>) {
        if self.mode != AppMode::Goto || serial != self.goto.serial {
            return;
        }
        self.goto.suggestion = text;
    }
}
