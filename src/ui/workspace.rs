use crate::app::state::DrawerProps;
use crate::style::Layer;
use crate::ui::css_colors::parse_css_color;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

/// First row to draw so that `selected` stays inside a window of `height`.
fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    selected.saturating_sub(height - 1)
}

fn layer_line(layer: &Layer, selected: bool, width: usize) -> Line<'static> {
    let visible = layer.is_visible();
    let swatch = layer
        .preview_color()
        .and_then(parse_css_color)
        .map(|c| Span::styled("██", Style::default().fg(c)))
        .unwrap_or_else(|| Span::styled("··", Theme::text_dim()));
    let marker = if visible { "● " } else { "○ " };

    let kind = format!(" {}", layer.kind);
    let id_width = width.saturating_sub(2 + 3 + kind.len());
    let mut id: String = layer.id.chars().take(id_width).collect();
    if layer.id.chars().count() > id_width && id_width > 0 {
        id.pop();
        id.push('…');
    }

    let name_style = if selected {
        Theme::selected()
    } else if visible {
        Theme::text()
    } else {
        Theme::hidden_layer()
    };

    Line::from(vec![
        Span::styled(marker, Theme::text_dim()),
        swatch,
        Span::raw(" "),
        Span::styled(format!("{:<w$}", id, w = id_width), name_style),
        Span::styled(kind, Theme::text_dim()),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, props: DrawerProps<'_>) {
    let focused = !props.work_context.is_modal();
    let layers = &props.map_style.layers;

    let block = Block::default()
        .title(format!(" Layers ({}) ", layers.len()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .padding(Padding::horizontal(1))
        .style(Theme::panel_bg());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < 10 {
        return;
    }

    if layers.is_empty() {
        let mut lines = vec![
            Line::from(Span::styled("No style loaded.", Theme::text_dim())),
            Line::from(vec![
                Span::styled("^O", Theme::key_hint()),
                Span::styled(" open a style file", Theme::text_dim()),
            ]),
        ];
        if props.access_token.is_none() {
            lines.push(Line::from(vec![
                Span::styled("F2", Theme::key_hint()),
                Span::styled(" set an access token", Theme::text_dim()),
            ]));
        }
        let empty = Paragraph::new(lines);
        frame.render_widget(empty, inner);
        return;
    }

    // Last row holds the key help
    let list_h = (inner.height as usize).saturating_sub(1);
    let list_w = inner.width.saturating_sub(1) as usize;
    let start = scroll_offset(props.selected_layer, list_h);

    let lines: Vec<Line> = layers
        .iter()
        .enumerate()
        .skip(start)
        .take(list_h)
        .map(|(i, layer)| layer_line(layer, i == props.selected_layer, list_w))
        .collect();
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x, inner.y, list_w as u16, list_h as u16),
    );

    if layers.len() > list_h {
        let scrollbar_area = Rect::new(inner.right().saturating_sub(1), inner.y, 1, list_h as u16);
        let mut scrollbar_state =
            ScrollbarState::new(layers.len().saturating_sub(list_h)).position(start);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .thumb_style(Theme::scrollbar_thumb())
                .track_style(Theme::scrollbar_track()),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }

    let help_area = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
    let help = Line::from(vec![
        Span::styled("v", Theme::key_hint()),
        Span::styled(" hide  ", Theme::text_dim()),
        Span::styled("x", Theme::key_hint()),
        Span::styled(" delete  ", Theme::text_dim()),
        Span::styled("J/K", Theme::key_hint()),
        Span::styled(" move", Theme::text_dim()),
    ]);
    frame.render_widget(Paragraph::new(help), help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::default_style;

    #[test]
    fn selection_stays_in_window() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(25, 10), 16);
        assert_eq!(scroll_offset(3, 0), 0);
    }

    #[test]
    fn layer_line_truncates_long_ids() {
        let mut layer = default_style().layers[0].clone();
        layer.id = "a-very-long-layer-identifier".into();
        let line = layer_line(&layer, false, 20);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains('…'));
        assert!(text.ends_with(&format!(" {}", layer.kind)));
    }
}
