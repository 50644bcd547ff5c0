use crate::app::state::ToolbarProps;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Key hint and whether the action behind it is currently usable.
fn hints(props: ToolbarProps) -> [(&'static str, &'static str, bool); 7] {
    let available = props.style_available;
    [
        ("^O", "Open", true),
        ("^S", "Save", available),
        ("^D", "Download", available),
        ("^R", "Reset", true),
        ("F1", "About", true),
        ("F2", "Settings", true),
        ("F3", "Sources", true),
    ]
}

pub fn render(frame: &mut Frame, area: Rect, props: ToolbarProps) {
    let mut spans = vec![Span::styled(
        " stylesmith ",
        Style::default()
            .fg(Theme::BG_DARK)
            .bg(Theme::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
    )];

    for (key, label, enabled) in hints(props) {
        let (key_style, label_style) = if enabled {
            (Theme::key_hint(), Theme::text())
        } else {
            (Theme::text_dim(), Theme::text_dim())
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(format!(" {}", label), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::panel_bg()), area);
}
