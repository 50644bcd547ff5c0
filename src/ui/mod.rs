mod css_colors;
mod layout;
mod map;
mod modal;
mod prompt;
mod status_bar;
mod theme;
mod toolbar;
mod workspace;

use crate::app::state::AppState;
use ratatui::prelude::*;

pub fn render(frame: &mut Frame, state: &AppState) {
    let app_layout = layout::compute_layout(frame.area());

    toolbar::render(frame, app_layout.toolbar, state.toolbar_props());
    workspace::render(frame, app_layout.drawer, state.drawer_props());
    map::render(frame, app_layout.map, state.map_props());
    status_bar::render(frame, app_layout.status_bar, state);

    // Overlays last so they draw on top
    modal::render(frame, state);
    prompt::render(frame, state);
}
