//! Preview pane: syntect-highlighted text with line numbers, or a centered
//! placeholder for binary/unreadable targets.
//!
//! The preview engine delivers decoded text plus an advisory [`SyntaxHint`];
//! resolving the hint against the syntax set and turning the text into styled
//! lines happens here, at render-apply time.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::app::PreviewState;
use crate::nav::preview::SyntaxHint;
use crate::theme::ThemeColors;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Look up a syntect theme by name, defaulting when absent or unknown.
pub fn load_theme(name: Option<&str>) -> Theme {
    let themes = ThemeSet::load_defaults().themes;
    name.and_then(|n| themes.get(n).cloned())
        .unwrap_or_else(|| themes[FALLBACK_THEME].clone())
}

/// Resolve the engine's advisory hint against the loaded syntax set.
fn resolve_syntax<'s>(hint: &SyntaxHint, ss: &'s SyntaxSet) -> &'s SyntaxReference {
    let found = match hint {
        SyntaxHint::Extension(ext) => ss.find_syntax_by_extension(ext),
        SyntaxHint::FirstLine(line) => ss.find_syntax_by_first_line(line),
        SyntaxHint::Plain => None,
    };
    found.unwrap_or_else(|| ss.find_syntax_plain_text())
}

/// Syntax-highlight decoded preview text into numbered, styled lines.
///
/// Returns `(lines, total_line_count)`. Highlighting failures degrade to the
/// raw line rather than dropping it.
pub fn highlight_text(
    text: &str,
    hint: &SyntaxHint,
    ss: &SyntaxSet,
    theme: &Theme,
) -> (Vec<Line<'static>>, usize) {
    let mut highlighter = HighlightLines::new(resolve_syntax(hint, ss), theme);

    let total = text.lines().count().max(1);
    let gutter_width = total.to_string().len();

    let mut styled = Vec::with_capacity(total);
    for (number, raw) in LinesWithEndings::from(text).enumerate() {
        let mut spans = vec![Span::styled(
            format!("{:>gutter_width$} │ ", number + 1),
            Style::default().fg(Color::DarkGray),
        )];
        match highlighter.highlight_line(raw, ss) {
            Ok(regions) => {
                for (region_style, fragment) in regions {
                    let fg = region_style.foreground;
                    spans.push(Span::styled(
                        fragment.trim_end_matches('\n').to_string(),
                        Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                    ));
                }
            }
            Err(_) => spans.push(Span::raw(raw.trim_end_matches('\n').to_string())),
        }
        styled.push(Line::from(spans));
    }

    if styled.is_empty() {
        styled.push(Line::from(Span::styled(
            "(empty file)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    (styled, total)
}

/// Preview widget that renders file content in the preview panel.
pub struct PreviewWidget<'a> {
    preview_state: &'a PreviewState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview_state: &'a PreviewState, theme: &'a ThemeColors) -> Self {
        Self {
            preview_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl Widget for PreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if let Some(placeholder) = self.preview_state.placeholder {
            let y = inner.y + inner.height / 2;
            let x = inner.x + (inner.width.saturating_sub(placeholder.len() as u16)) / 2;
            let line = Line::from(Span::styled(
                placeholder,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::BOLD),
            ));
            buf.set_line(x, y, &line, inner.width);
            return;
        }

        let visible_height = inner.height as usize;
        let start = self
            .preview_state
            .scroll_offset
            .min(self.preview_state.lines.len());
        let end = (start + visible_height).min(self.preview_state.lines.len());

        for (i, line) in self.preview_state.lines[start..end].iter().enumerate() {
            let y = inner.y + i as u16;
            buf.set_line(inner.x, y, line, inner.width);
        }
    }
}
