use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub toolbar: Rect,
    pub drawer: Rect,
    pub map: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    // Vertical: toolbar | content | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Toolbar
            Constraint::Min(5),    // Drawer + map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Horizontal: layer drawer | gap | map preview
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(main_chunks[1]);

    AppLayout {
        toolbar: main_chunks[0],
        drawer: content[0],
        map: content[1],
        status_bar: main_chunks[2],
    }
}

fn percent_of(len: u16, pct: u16) -> u16 {
    u16::try_from(u32::from(len) * u32::from(pct) / 100).unwrap_or(u16::MAX)
}

/// Centered popup rectangle: `pct_w`/`pct_h` of `area`, at least
/// `min_w`x`min_h`, never larger than `area` minus a small margin.
pub fn popup_rect(area: Rect, pct_w: u16, pct_h: u16, min_w: u16, min_h: u16) -> Rect {
    let w = percent_of(area.width, pct_w)
        .max(min_w)
        .min(area.width.saturating_sub(4));
    let h = percent_of(area.height, pct_h)
        .max(min_h)
        .min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fills_the_frame() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = compute_layout(area);
        assert_eq!(layout.toolbar.height, 1);
        assert_eq!(layout.status_bar.y, 39);
        assert_eq!(layout.drawer.width, 36);
        assert_eq!(layout.map.x, 37);
        assert_eq!(layout.map.right(), 120);
    }

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 30);
        let popup = popup_rect(area, 50, 50, 10, 5);
        assert_eq!(popup, Rect::new(25, 7, 50, 15));

        let tiny = Rect::new(0, 0, 20, 6);
        let clamped = popup_rect(tiny, 50, 50, 60, 20);
        assert_eq!(clamped.width, 16);
        assert_eq!(clamped.height, 4);
    }

    #[test]
    fn popup_fits_very_wide_terminals() {
        let wide = Rect::new(0, 0, 2000, 1200);
        let popup = popup_rect(wide, 60, 50, 40, 5);
        assert_eq!(popup, Rect::new(400, 300, 1200, 600));

        let huge = Rect::new(0, 0, u16::MAX, u16::MAX);
        let popup = popup_rect(huge, 100, 100, 0, 0);
        assert_eq!(popup.width, u16::MAX - 4);
        assert_eq!(popup.height, u16::MAX - 2);
    }
}
