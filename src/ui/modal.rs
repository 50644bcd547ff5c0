use crate::app::state::{AppState, WorkContext};
use crate::ui::layout::popup_rect;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use serde_json::Value;

/// Show only the start of a token.
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "*".repeat(token.chars().count())
    } else {
        format!("{}…", visible)
    }
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), Theme::text_dim()),
        Span::styled(value, Theme::text()),
    ])
}

fn settings_lines(state: &AppState) -> Vec<Line<'static>> {
    let token = state
        .access_token
        .as_deref()
        .map(mask_token)
        .unwrap_or_else(|| "(not set)".to_string());
    let backend = state
        .store_kind
        .map(|k| k.label().to_string())
        .unwrap_or_else(|| "(probing)".to_string());
    vec![
        Line::default(),
        field("Access token", token),
        field("Storage", backend),
        field("Settings file", state.settings.path().display().to_string()),
        Line::default(),
        Line::from(vec![
            Span::styled("  t", Theme::key_hint()),
            Span::styled(" edit access token  ", Theme::text_dim()),
            Span::styled("Esc", Theme::key_hint()),
            Span::styled(" close", Theme::text_dim()),
        ]),
    ]
}

fn about_lines() -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  stylesmith {}", env!("CARGO_PKG_VERSION")),
            Theme::title(),
        )),
        Line::from(Span::styled(
            format!("  {}", env!("CARGO_PKG_DESCRIPTION")),
            Theme::text(),
        )),
        Line::default(),
        Line::from(Span::styled(
            "  Styles are saved to the style server when one answers,",
            Theme::text_dim(),
        )),
        Line::from(Span::styled(
            "  otherwise to local storage.",
            Theme::text_dim(),
        )),
    ]
}

fn sources_lines(state: &AppState) -> Vec<Line<'static>> {
    let sources = &state.current_style.sources;
    if sources.is_empty() {
        return vec![
            Line::default(),
            Line::from(Span::styled("  This style has no sources.", Theme::text_dim())),
        ];
    }
    let mut lines = vec![Line::default()];
    for (name, source) in sources {
        let kind = source.get("type").and_then(Value::as_str).unwrap_or("?");
        let location = source
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                let tiles = source.get("tiles")?.as_array()?;
                tiles.first()?.as_str().map(str::to_string)
            })
            .unwrap_or_else(|| "(inline data)".to_string());
        let used_by = state
            .current_style
            .layers
            .iter()
            .filter(|l| l.source.as_deref() == Some(name.as_str()))
            .count();
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", name), Theme::title()),
            Span::styled(format!("  {} · {} layers", kind, used_by), Theme::text_dim()),
        ]));
        lines.push(Line::from(Span::styled(format!("    {}", location), Theme::text())));
    }
    lines
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let (title, lines) = match state.work_context {
        WorkContext::Layers => return,
        WorkContext::Settings => (" Settings ", settings_lines(state)),
        WorkContext::About => (" About ", about_lines()),
        WorkContext::Sources => (" Sources ", sources_lines(state)),
    };

    let popup_area = popup_rect(frame.area(), 60, 50, 50, 12);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused())
        .style(Theme::popup_bg());

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_masked() {
        assert_eq!(mask_token("tok123"), "tok1…");
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token(""), "");
    }
}
