use crate::app::state::*;
use crate::ui::layout::popup_rect;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn render(frame: &mut Frame, state: &AppState) {
    let Some(prompt) = &state.prompt else {
        return;
    };

    let area = popup_rect(frame.area(), 60, 0, 40, 5);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(prompt.kind.title())
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused())
        .padding(Padding::horizontal(1))
        .style(Theme::popup_bg());

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let help = match prompt.kind {
        PromptKind::ConfirmReset => {
            let question = Line::from(vec![
                Span::styled("Delete all saved styles and restore the default? ", Theme::text()),
                Span::styled("y/n", Theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(question), inner);
            return;
        }
        PromptKind::UploadPath => "Enter upload  Esc cancel",
        PromptKind::AccessToken => "Enter save  Esc cancel  empty clears",
    };

    let input = &prompt.input;
    let line = Line::from(vec![
        Span::styled("❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
        Span::styled(input.text.as_str(), Theme::text()),
    ]);
    let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(Paragraph::new(line), input_area);

    let help_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(help, Theme::text_dim())),
        help_area,
    );

    frame.set_cursor_position((cursor_x(inner, input.cursor_column()), inner.y));
}

/// Screen column of the cursor, kept inside `inner`.
fn cursor_x(inner: Rect, column: usize) -> u16 {
    let column = u16::try_from(column).unwrap_or(u16::MAX);
    // Chevron "❯ " takes two columns
    inner
        .x
        .saturating_add(2)
        .saturating_add(column)
        .min(inner.right().saturating_sub(1))
}
