//! Goto path editor: a single-line input with cursor, validity coloring, and
//! an inline ghost rendering of the pending autocompletion.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::GotoState;
use crate::theme::ThemeColors;

/// The part of the suggestion not yet typed, shown dim after the input.
///
/// Matching is case-insensitive (the suggestion engine matches prefixes that
/// way); a byte-misaligned slice means no ghost rather than a panic.
pub fn ghost_remainder<'a>(input: &str, suggestion: &'a str) -> Option<&'a str> {
    if input.is_empty() || suggestion.len() <= input.len() {
        return None;
    }
    let typed = suggestion.get(..input.len())?;
    if !typed.eq_ignore_ascii_case(input) {
        return None;
    }
    suggestion.get(input.len()..)
}

/// Single-line path editor rendered in place of the path display.
pub struct GotoInputWidget<'a> {
    state: &'a GotoState,
    theme: &'a ThemeColors,
}

impl<'a> GotoInputWidget<'a> {
    pub fn new(state: &'a GotoState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }
}

impl Widget for GotoInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let input = &self.state.input;
        let cursor_pos = self.state.cursor;

        let input_style = if self.state.is_valid {
            Style::default()
                .fg(self.theme.success_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.theme.error_fg)
                .add_modifier(Modifier::BOLD)
        };
        let cursor_style = Style::default()
            .bg(self.theme.status_fg)
            .add_modifier(Modifier::BOLD);
        let ghost_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);

        let (before, cursor_char, after) = if cursor_pos < input.len() {
            let ch_end = input[cursor_pos..]
                .chars()
                .next()
                .map(|c| cursor_pos + c.len_utf8())
                .unwrap_or(input.len());
            (&input[..cursor_pos], &input[cursor_pos..ch_end], &input[ch_end..])
        } else {
            (input.as_str(), " ", "")
        };

        let mut spans = vec![
            Span::raw(" 📂 "),
            Span::styled(before, input_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, input_style),
        ];

        // Ghost completion only makes sense with the cursor at the end.
        if cursor_pos >= input.len() {
            if let Some(suggestion) = &self.state.suggestion {
                if let Some(remainder) = ghost_remainder(input, suggestion) {
                    // The cursor cell already covers the first ghost char.
                    let mut chars = remainder.chars();
                    let first = chars.next().map(|c| c.to_string()).unwrap_or_default();
                    let rest = chars.as_str().to_string();
                    spans.pop();
                    spans.pop();
                    spans.push(Span::styled(first, cursor_style));
                    spans.push(Span::styled(rest, ghost_style));
                }
            }
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
