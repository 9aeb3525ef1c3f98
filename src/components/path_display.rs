use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Top line showing the current root path.
pub struct PathDisplayWidget<'a> {
    path_str: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> PathDisplayWidget<'a> {
    pub fn new(path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self { path_str, theme }
    }
}

impl Widget for PathDisplayWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let line = Line::from(vec![
            Span::raw(" 📁 "),
            Span::styled(
                self.path_str,
                Style::default()
                    .fg(self.theme.path_fg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
