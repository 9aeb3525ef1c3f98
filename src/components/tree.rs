use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;
use crate::tree::{FlatEntry, TreeViewState};

/// Tree widget that renders the directory tree with box-drawing characters.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeViewState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeViewState, theme: &'a ThemeColors) -> Self {
        Self {
            tree_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Box-drawing guides for one entry.
    ///
    /// A continuation bar is drawn at an ancestor level while that ancestor
    /// still has siblings below, which a forward scan of the flattened list
    /// can read off directly: another entry at the same level appears before
    /// the list returns to a shallower depth.
    fn guide_cells(entries: &[FlatEntry], index: usize) -> String {
        let entry = &entries[index];
        if entry.depth == 0 {
            return String::new();
        }

        let mut cells = String::new();
        for level in 1..entry.depth {
            let ancestor_continues = entries[index + 1..]
                .iter()
                .take_while(|e| e.depth >= level)
                .any(|e| e.depth == level);
            cells.push_str(if ancestor_continues { "│  " } else { "   " });
        }
        cells.push_str(if entry.is_last_sibling { "└──" } else { "├──" });
        cells
    }

    fn entry_indicator(entry: &FlatEntry) -> &'static str {
        if entry.is_dir {
            if entry.is_expanded {
                "▾ "
            } else {
                "▸ "
            }
        } else {
            "  "
        }
    }
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let entries = &self.tree_state.flat_entries;
        let selected = self.tree_state.selected_index;
        let visible_height = inner_area.height as usize;

        if entries.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.tree_state.scroll_offset;
        let visible_entries = entries.iter().enumerate().skip(scroll).take(visible_height);

        for (i, (idx, entry)) in visible_entries.enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }

            let prefix = Self::guide_cells(entries, idx);
            let indicator = Self::entry_indicator(entry);

            let style = if idx == selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if entry.is_hidden {
                Style::default().fg(self.theme.tree_hidden_fg)
            } else if entry.is_dir {
                Style::default()
                    .fg(self.theme.tree_dir_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.tree_file_fg)
            };

            let line_content = format!("{}{}{}", prefix, indicator, entry.name);
            let line = Line::from(Span::styled(line_content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DirChild;
    use crate::theme::dark_theme;
    use ratatui::widgets::Borders;
    use std::path::{Path, PathBuf};

    fn sample_state() -> TreeViewState {
        let mut state = TreeViewState::new(PathBuf::from("/root"));
        state.apply_children(
            Path::new("/root"),
            &[
                DirChild {
                    path: PathBuf::from("/root/dir_a"),
                    is_dir: true,
                },
                DirChild {
                    path: PathBuf::from("/root/file_b.txt"),
                    is_dir: false,
                },
            ],
        );
        state
    }

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn renders_entries_with_guides() {
        let state = sample_state();
        let theme = dark_theme();
        let widget = TreeWidget::new(&state, &theme)
            .block(Block::default().borders(Borders::ALL).title(" root "));
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("root"));
        assert!(content.contains("├──"));
        assert!(content.contains("└──"));
        assert!(content.contains("dir_a"));
        assert!(content.contains("file_b.txt"));
    }

    #[test]
    fn collapsed_directory_shows_closed_indicator() {
        let state = sample_state();
        let theme = dark_theme();
        let widget = TreeWidget::new(&state, &theme);
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("▸ dir_a"));
        assert!(content.contains("▾ root"));
    }

    #[test]
    fn empty_area_is_a_noop() {
        let state = sample_state();
        let theme = dark_theme();
        let widget = TreeWidget::new(&state, &theme);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
