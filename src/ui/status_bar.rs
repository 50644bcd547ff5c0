use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = vec![Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    )];

    if let Some(notice) = &state.notice {
        parts.push(Span::styled(
            format!("[{}] ", notice.timestamp),
            Theme::timestamp(),
        ));
        let style = match notice.kind {
            NoticeKind::Info => Theme::notice_info(),
            NoticeKind::Error => Theme::notice_error(),
        };
        parts.push(Span::styled(notice.text.clone(), style));
    }

    // Pad so the context badge sits at the right edge
    let badge = format!(" [{}] ", state.work_context.label());
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + badge.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(badge, Theme::context_badge()));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
