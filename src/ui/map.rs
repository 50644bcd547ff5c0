use crate::app::state::MapProps;
use crate::style::StyleDocument;
use crate::ui::css_colors::parse_css_color;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use serde_json::Value;

/// Whether any source is served from Mapbox and so needs an access token.
fn uses_mapbox(style: &StyleDocument) -> bool {
    let is_mapbox = |v: &Value| v.as_str().is_some_and(|u| u.starts_with("mapbox://"));
    style.sources.values().any(|source| {
        source.get("url").is_some_and(is_mapbox)
            || source
                .get("tiles")
                .and_then(Value::as_array)
                .is_some_and(|tiles| tiles.iter().any(is_mapbox))
    })
}

/// Colour of the `background` layer, used to fill the preview.
fn background_color(style: &StyleDocument) -> Option<Color> {
    style
        .layers
        .iter()
        .find(|l| l.kind == "background" && l.is_visible())
        .and_then(|l| l.preview_color())
        .and_then(parse_css_color)
}

/// One row per visible non-background layer, topmost first.
fn stack_lines(style: &StyleDocument, width: usize) -> Vec<Line<'static>> {
    style
        .layers
        .iter()
        .rev()
        .filter(|l| l.is_visible() && l.kind != "background")
        .map(|layer| {
            let color = layer
                .preview_color()
                .and_then(parse_css_color)
                .unwrap_or(Theme::TEXT_SECONDARY);
            let label = format!(" {} ", layer.id);
            let bar = width.saturating_sub(label.chars().count() + 2);
            Line::from(vec![
                Span::raw("  "),
                Span::styled("▀".repeat(bar), Style::default().fg(color)),
                Span::styled(label, Theme::text_dim()),
            ])
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, props: MapProps<'_>) {
    let style = props.map_style;

    let token_span = match (props.access_token, uses_mapbox(style)) {
        (Some(_), _) => Span::styled(" token set ", Style::default().fg(Theme::ACCENT_GREEN)),
        (None, true) => Span::styled(
            " access token required ",
            Style::default().fg(Theme::ACCENT_RED),
        ),
        (None, false) => Span::styled(" no token ", Theme::text_dim()),
    };

    let mut block = Block::default()
        .title(format!(" {} ", style.display_name()))
        .title_style(Theme::title())
        .title_bottom(Line::from(token_span).right_aligned())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());
    block = match background_color(style) {
        Some(bg) => block.style(Style::default().bg(bg)),
        None => block.style(Theme::panel_bg()),
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width < 4 {
        return;
    }

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {} source{}, {} layers",
            style.sources.len(),
            if style.sources.len() == 1 { "" } else { "s" },
            style.layers.len()
        ),
        Theme::text_dim(),
    ))];
    lines.push(Line::default());
    lines.extend(stack_lines(style, inner.width as usize));

    frame.render_widget(Paragraph::new(lines), inner);
}
