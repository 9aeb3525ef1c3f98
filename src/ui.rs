use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::goto_input::GotoInputWidget;
use crate::components::info_bar::InfoBarWidget;
use crate::components::path_display::PathDisplayWidget;
use crate::components::preview::PreviewWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // path display / goto input
            Constraint::Min(1),    // tree + preview
            Constraint::Length(1), // info bar / status
        ])
        .split(area);

    // Top line: goto editor replaces the path display while open.
    match app.mode {
        AppMode::Goto => {
            frame.render_widget(GotoInputWidget::new(&app.goto, &app.theme), rows[0]);
        }
        AppMode::Normal => {
            let path_str = app.controller.root().display().to_string();
            frame.render_widget(PathDisplayWidget::new(&path_str, &app.theme), rows[0]);
        }
    }

    // Main area: tree alone, or split with the preview panel.
    let main = rows[1];
    let panes = if app.controller.preview_visible() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(main)
    };

    let visible_height = panes[0].height.saturating_sub(2) as usize;
    app.tree.update_scroll(visible_height);

    let tree_block = Block::default()
        .title(format!(" {} ", app.tree.root.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focused_fg));
    frame.render_widget(TreeWidget::new(&app.tree, &app.theme).block(tree_block), panes[0]);

    if app.controller.preview_visible() {
        let preview_block = Block::default()
            .title(" Preview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_fg));
        frame.render_widget(
            PreviewWidget::new(&app.preview, &app.theme).block(preview_block),
            panes[1],
        );
    }

    // Bottom line: transient status messages override the info bar.
    if let Some(ref msg) = app.status_message {
        let style = if msg.is_error {
            Style::default().fg(app.theme.error_fg)
        } else {
            Style::default().fg(app.theme.success_fg)
        };
        let line = Line::from(Span::styled(format!(" {}", msg.text), style));
        frame.render_widget(
            ratatui::widgets::Paragraph::new(line),
            rows[2],
        );
    } else {
        frame.render_widget(
            InfoBarWidget::new(app.entry_info.as_ref(), app.stat_failed, &app.theme),
            rows[2],
        );
    }
}
