use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::intent::Intent;
use crate::app::state::*;
use crate::config::expand_home;
use crate::style::load_style_file;
use chrono::Utc;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;
use tracing::{debug, warn};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => handle_terminal(state, cevent),
        AppEvent::StoreSelected { kind } => {
            state.store_kind = Some(kind);
            state.notify_info(format!("Storing styles in {}", kind.label()));
            vec![]
        }
        AppEvent::LatestStyleLoaded { style } => reduce(state, Intent::Upload(style)),
        AppEvent::DefaultStyleLoaded { style } => {
            state.notify_info("Saved styles deleted, default style restored".to_string());
            reduce(state, Intent::Upload(style))
        }
        AppEvent::StyleSaved {
            style,
            adopt,
            revision,
        } => {
            if adopt {
                state.adopt_style(style);
                state.mark_saved();
            } else {
                // Edits made while the save was in flight stay unsaved
                if revision == state.revision {
                    state.mark_saved();
                }
                state.notify_info(format!("Saved {}", style.display_name()));
            }
            vec![]
        }
        AppEvent::StoreFailed { operation, error } => {
            warn!("{} failed: {}", operation, error);
            state.notify_error(format!("{} failed: {}", operation, error));
            vec![]
        }
        AppEvent::Tick => {
            state.expire_notice(Instant::now());
            vec![]
        }
    }
}

/// Apply `intent` to the state and return the side effects it needs.
pub fn reduce(state: &mut AppState, intent: Intent) -> Vec<Action> {
    debug!("intent: {:?}", IntentName(&intent));
    match intent {
        Intent::Save => {
            let style = state.current_style.stamped(Utc::now());
            state.adopt_style(style.clone());
            vec![Action::SaveStyle {
                style,
                adopt: false,
                revision: state.revision,
            }]
        }
        Intent::Upload(style) => vec![Action::SaveStyle {
            style,
            adopt: true,
            revision: state.revision,
        }],
        Intent::Download => {
            let mut actions = vec![Action::ExportStyle {
                style: state.current_style.clone(),
            }];
            actions.extend(reduce(state, Intent::Save));
            actions
        }
        Intent::Reset => vec![Action::ResetStore],
        Intent::StyleChanged(style) => {
            state.adopt_style(style);
            vec![]
        }
        Intent::AccessTokenChanged(token) => {
            let token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
            state.access_token = token.clone();
            state.dirty = true;
            if let Err(e) = state.settings.set_access_token(token) {
                warn!("Could not store access token: {:#}", e);
                state.notify_error(format!("Could not store access token: {}", e));
            }
            vec![]
        }
        Intent::OpenSettings | Intent::OpenAbout | Intent::OpenSources | Intent::CloseModal => {
            state.work_context = state.work_context.after(&intent);
            state.dirty = true;
            vec![]
        }
        Intent::Quit => {
            state.should_quit = true;
            vec![]
        }
    }
}

/// Debug view of an intent without dumping whole style documents.
struct IntentName<'a>(&'a Intent);

impl std::fmt::Debug for IntentName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Intent::Upload(style) => write!(f, "Upload({})", style.display_name()),
            Intent::StyleChanged(style) => write!(f, "StyleChanged({})", style.display_name()),
            Intent::AccessTokenChanged(_) => write!(f, "AccessTokenChanged(..)"),
            other => write!(f, "{:?}", other),
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => {
            state.dirty = true;
            handle_key(state, key)
        }
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return reduce(state, Intent::Quit);
    }

    // Prompts capture all input while open
    if state.prompt.is_some() {
        return handle_prompt_key(state, key);
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('s') => {
                if state.toolbar_props().style_available {
                    reduce(state, Intent::Save)
                } else {
                    state.notify_info("No style to save yet".to_string());
                    vec![]
                }
            }
            KeyCode::Char('d') => {
                if state.toolbar_props().style_available {
                    reduce(state, Intent::Download)
                } else {
                    state.notify_info("No style to download yet".to_string());
                    vec![]
                }
            }
            KeyCode::Char('o') => {
                state.open_prompt(PromptKind::UploadPath, "");
                vec![]
            }
            KeyCode::Char('r') => {
                state.open_prompt(PromptKind::ConfirmReset, "");
                vec![]
            }
            _ => vec![],
        };
    }

    match key.code {
        KeyCode::F(1) => return reduce(state, Intent::OpenAbout),
        KeyCode::F(2) => return reduce(state, Intent::OpenSettings),
        KeyCode::F(3) => return reduce(state, Intent::OpenSources),
        _ => {}
    }

    if state.work_context.is_modal() {
        handle_modal_key(state, key)
    } else {
        handle_drawer_key(state, key)
    }
}

fn handle_modal_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => reduce(state, Intent::CloseModal),
        KeyCode::Char('t') if state.work_context == WorkContext::Settings => {
            let current = state.access_token.clone().unwrap_or_default();
            state.open_prompt(PromptKind::AccessToken, &current);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_drawer_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let selected = state.selected_layer;
    let has_selection = selected < state.current_style.layers.len();
    match key.code {
        KeyCode::Char('q') => reduce(state, Intent::Quit),
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev_layer();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next_layer();
            vec![]
        }
        KeyCode::Char('v') if has_selection => {
            let style = state.current_style.with_layer_visibility_toggled(selected);
            reduce(state, Intent::StyleChanged(style))
        }
        KeyCode::Delete | KeyCode::Char('x') if has_selection => {
            let style = state.current_style.without_layer(selected);
            reduce(state, Intent::StyleChanged(style))
        }
        KeyCode::Char('K') if has_selection && selected > 0 => {
            let style = state.current_style.with_layer_moved(selected, true);
            let actions = reduce(state, Intent::StyleChanged(style));
            state.selected_layer = selected - 1;
            actions
        }
        KeyCode::Char('J') if selected + 1 < state.current_style.layers.len() => {
            let style = state.current_style.with_layer_moved(selected, false);
            let actions = reduce(state, Intent::StyleChanged(style));
            state.selected_layer = selected + 1;
            actions
        }
        _ => vec![],
    }
}

fn handle_prompt_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Some(prompt) = state.prompt.as_mut() else {
        return vec![];
    };

    if prompt.kind == PromptKind::ConfirmReset {
        state.close_prompt();
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => reduce(state, Intent::Reset),
            _ => vec![],
        };
    }

    let input = &mut prompt.input;
    match key.code {
        KeyCode::Esc => {
            state.close_prompt();
        }
        KeyCode::Enter => {
            if let Some(prompt) = state.close_prompt() {
                return submit_prompt(state, prompt);
            }
        }
        KeyCode::Backspace => input.delete_back(),
        KeyCode::Delete => input.delete_forward(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            input.insert_char(c)
        }
        _ => {}
    }
    vec![]
}

fn submit_prompt(state: &mut AppState, prompt: Prompt) -> Vec<Action> {
    match prompt.kind {
        PromptKind::UploadPath => {
            let path = prompt.input.text.trim();
            if path.is_empty() {
                return vec![];
            }
            match load_style_file(&expand_home(path)) {
                Ok(style) => {
                    state.notify_info(format!("Uploading {}", style.display_name()));
                    reduce(state, Intent::Upload(style))
                }
                Err(e) => {
                    warn!("Could not open style file {}: {}", path, e);
                    state.notify_error(format!("Could not open {}: {}", path, e));
                    vec![]
                }
            }
        }
        PromptKind::AccessToken => reduce(state, Intent::AccessTokenChanged(prompt.input.text)),
        PromptKind::ConfirmReset => vec![],
    }
}
