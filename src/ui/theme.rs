use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const BG_DARK: Color = Color::Rgb(22, 24, 29);
    pub const BG_SURFACE: Color = Color::Rgb(32, 35, 42);
    pub const BORDER_DIM: Color = Color::Rgb(70, 75, 87);
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 146, 158);
    pub const ACCENT_TEAL: Color = Color::Rgb(86, 182, 194);
    pub const ACCENT_AMBER: Color = Color::Rgb(229, 192, 123);
    pub const ACCENT_GREEN: Color = Color::Rgb(152, 195, 121);
    pub const ACCENT_RED: Color = Color::Rgb(224, 108, 117);

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn border_type() -> BorderType {
        BorderType::Rounded
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Self::BG_DARK)
    }

    pub fn popup_bg() -> Style {
        Style::default().bg(Self::BG_SURFACE)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_AMBER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hidden_layer() -> Style {
        Style::default()
            .fg(Self::TEXT_SECONDARY)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_SURFACE)
    }

    pub fn notice_info() -> Style {
        Style::default().fg(Self::ACCENT_GREEN).bg(Self::BG_SURFACE)
    }

    pub fn notice_error() -> Style {
        Style::default()
            .fg(Self::ACCENT_RED)
            .bg(Self::BG_SURFACE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn timestamp() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY).bg(Self::BG_SURFACE)
    }

    pub fn context_badge() -> Style {
        Style::default().fg(Self::ACCENT_TEAL).bg(Self::BG_SURFACE)
    }

    pub fn scrollbar_thumb() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn scrollbar_track() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }
}
