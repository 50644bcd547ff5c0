use crate::app::intent::Intent;
use crate::config::{SettingsStore, UiConfig};
use crate::store::StoreKind;
use crate::style::StyleDocument;
use chrono::Local;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Which panel or overlay is active. `Layers` is the base context; the
/// others are modal overlays drawn on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkContext {
    Layers,
    Settings,
    About,
    Sources,
}

impl WorkContext {
    pub fn is_modal(self) -> bool {
        self != WorkContext::Layers
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkContext::Layers => "LAYERS",
            WorkContext::Settings => "SETTINGS",
            WorkContext::About => "ABOUT",
            WorkContext::Sources => "SOURCES",
        }
    }

    /// Context after `intent`. Opening a modal replaces any open one;
    /// closing always returns to `Layers`.
    pub fn after(self, intent: &Intent) -> Self {
        match intent {
            Intent::OpenSettings => WorkContext::Settings,
            Intent::OpenAbout => WorkContext::About,
            Intent::OpenSources => WorkContext::Sources,
            Intent::CloseModal => WorkContext::Layers,
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub timestamp: String,
    pub shown_at: Instant,
}

/// Single-line text field.
#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    /// Byte offset into `text`, always on a char boundary.
    pub cursor: usize,
}

impl InputState {
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.next_boundary();
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Terminal columns between the start of the text and the cursor.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].width()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Path of a style JSON file to upload
    UploadPath,
    AccessToken,
    /// y/n before a reset
    ConfirmReset,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::UploadPath => " Open style file ",
            PromptKind::AccessToken => " Access token ",
            PromptKind::ConfirmReset => " Reset ",
        }
    }
}

#[derive(Debug)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: InputState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarProps {
    pub style_available: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DrawerProps<'a> {
    pub work_context: WorkContext,
    pub map_style: &'a StyleDocument,
    pub access_token: Option<&'a str>,
    pub selected_layer: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MapProps<'a> {
    pub map_style: &'a StyleDocument,
    pub access_token: Option<&'a str>,
}

pub struct AppState {
    pub access_token: Option<String>,
    pub work_context: WorkContext,
    pub current_style: StyleDocument,
    pub settings: SettingsStore,
    /// Unknown until the store worker has probed.
    pub store_kind: Option<StoreKind>,
    pub selected_layer: usize,
    pub prompt: Option<Prompt>,
    pub notice: Option<Notice>,
    /// Bumped whenever a new style value is adopted.
    pub revision: u64,
    pub saved_revision: u64,
    pub should_quit: bool,
    pub dirty: bool,
    pub timestamp_format: String,
    pub notice_ttl: Duration,
}

impl AppState {
    pub fn new(settings: SettingsStore, ui: &UiConfig) -> Self {
        let access_token = settings.access_token().map(str::to_string);
        Self {
            access_token,
            work_context: WorkContext::Layers,
            current_style: StyleDocument::empty(),
            settings,
            store_kind: None,
            selected_layer: 0,
            prompt: None,
            notice: None,
            revision: 0,
            saved_revision: 0,
            should_quit: false,
            dirty: true,
            timestamp_format: ui.timestamp_format.clone(),
            notice_ttl: Duration::from_secs(ui.notice_secs),
        }
    }

    /// Replace the current style with a new value.
    pub fn adopt_style(&mut self, style: StyleDocument) {
        self.current_style = style;
        let last = self.current_style.layers.len().saturating_sub(1);
        self.selected_layer = self.selected_layer.min(last);
        self.revision += 1;
        self.dirty = true;
    }

    pub fn mark_saved(&mut self) {
        self.saved_revision = self.revision;
        self.dirty = true;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.saved_revision != self.revision
    }

    pub fn toolbar_props(&self) -> ToolbarProps {
        ToolbarProps {
            style_available: self.current_style.has_layers(),
        }
    }

    pub fn drawer_props(&self) -> DrawerProps<'_> {
        DrawerProps {
            work_context: self.work_context,
            map_style: &self.current_style,
            access_token: self.access_token.as_deref(),
            selected_layer: self.selected_layer,
        }
    }

    pub fn map_props(&self) -> MapProps<'_> {
        MapProps {
            map_style: &self.current_style,
            access_token: self.access_token.as_deref(),
        }
    }

    fn notify(&mut self, kind: NoticeKind, text: String) {
        self.notice = Some(Notice {
            text,
            kind,
            timestamp: Local::now().format(&self.timestamp_format).to_string(),
            shown_at: Instant::now(),
        });
        self.dirty = true;
    }

    pub fn notify_info(&mut self, text: String) {
        self.notify(NoticeKind::Info, text);
    }

    pub fn notify_error(&mut self, text: String) {
        self.notify(NoticeKind::Error, text);
    }

    /// Drop the notice once it has been shown for `notice_ttl`. Errors stay
    /// until replaced.
    pub fn expire_notice(&mut self, now: Instant) {
        let expired = self.notice.as_ref().is_some_and(|n| {
            n.kind == NoticeKind::Info && now.duration_since(n.shown_at) >= self.notice_ttl
        });
        if expired {
            self.notice = None;
            self.dirty = true;
        }
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.prompt = Some(Prompt {
            kind,
            input: InputState::with_text(initial),
        });
        self.dirty = true;
    }

    pub fn close_prompt(&mut self) -> Option<Prompt> {
        self.dirty = true;
        self.prompt.take()
    }

    pub fn select_next_layer(&mut self) {
        let count = self.current_style.layers.len();
        if count > 0 && self.selected_layer + 1 < count {
            self.selected_layer += 1;
            self.dirty = true;
        }
    }

    pub fn select_prev_layer(&mut self) {
        if self.selected_layer > 0 {
            self.selected_layer -= 1;
            self.dirty = true;
        }
    }

    pub fn status_line(&self) -> String {
        let backend = self
            .store_kind
            .map(|k| k.label())
            .unwrap_or("connecting to store...");
        let layers = self.current_style.layers.len();
        let mut s = format!(
            "{} | {} layer{} | {}",
            self.current_style.display_name(),
            layers,
            if layers == 1 { "" } else { "s" },
            backend
        );
        if self.has_unsaved_changes() {
            s.push_str(" | unsaved");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::default_style;

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::open(dir.path().join("settings.toml")).unwrap();
        (dir, AppState::new(settings, &UiConfig::default()))
    }

    #[test]
    fn starts_with_empty_style_and_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        SettingsStore::open(&path)
            .unwrap()
            .set_access_token(Some("stored".into()))
            .unwrap();

        let state = AppState::new(SettingsStore::open(&path).unwrap(), &UiConfig::default());
        assert_eq!(state.access_token.as_deref(), Some("stored"));
        assert_eq!(state.work_context, WorkContext::Layers);
        assert!(!state.current_style.has_layers());
    }

    #[test]
    fn style_available_tracks_layers() {
        let (_dir, mut state) = state();
        assert!(!state.toolbar_props().style_available);

        state.adopt_style(default_style());
        assert!(state.toolbar_props().style_available);

        state.adopt_style(default_style().with_layers(Vec::new()));
        assert!(!state.toolbar_props().style_available);
    }

    #[test]
    fn adopting_clamps_layer_selection() {
        let (_dir, mut state) = state();
        state.adopt_style(default_style());
        for _ in 0..100 {
            state.select_next_layer();
        }
        assert_eq!(state.selected_layer, default_style().layers.len() - 1);

        let two = default_style().with_layers(default_style().layers[..2].to_vec());
        state.adopt_style(two);
        assert_eq!(state.selected_layer, 1);
    }

    #[test]
    fn work_context_transitions() {
        let ctx = WorkContext::Layers;
        assert_eq!(ctx.after(&Intent::OpenSettings), WorkContext::Settings);
        assert_eq!(
            WorkContext::Settings.after(&Intent::OpenAbout),
            WorkContext::About
        );
        assert_eq!(
            WorkContext::Sources.after(&Intent::CloseModal),
            WorkContext::Layers
        );
        assert_eq!(WorkContext::About.after(&Intent::Save), WorkContext::About);
        assert!(!WorkContext::Layers.is_modal());
        assert!(WorkContext::Sources.is_modal());
    }

    #[test]
    fn info_notices_expire_but_errors_stay() {
        let (_dir, mut state) = state();
        state.notify_info("saved".into());
        let later = Instant::now() + state.notice_ttl;
        state.expire_notice(later);
        assert!(state.notice.is_none());

        state.notify_error("failed".into());
        state.expire_notice(Instant::now() + state.notice_ttl * 10);
        assert!(state.notice.is_some());
    }

    #[test]
    fn input_editing_respects_char_boundaries() {
        let mut input = InputState::with_text("héllo");
        input.move_left();
        input.move_left();
        input.move_left();
        input.move_left();
        input.delete_back();
        assert_eq!(input.text, "éllo");
        assert_eq!(input.cursor, 0);
        input.delete_forward();
        assert_eq!(input.text, "llo");
        input.move_end();
        input.insert_char('ß');
        assert_eq!(input.text, "lloß");
        assert_eq!(input.cursor_column(), 4);
    }
}
