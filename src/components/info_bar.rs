//! Info bar: `ls -la`-style metadata for the highlighted entry.
//!
//! Gathering stats is a single metadata call for the one highlighted path;
//! formatting is pure and testable in isolation.

use std::path::Path;

use chrono::{DateTime, Datelike, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Stat metadata for the highlighted entry.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    pub mode: String,
    pub owner: String,
    pub group: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub is_dir: bool,
}

impl EntryInfo {
    /// Stat `path` (following symlinks) and resolve owner/group names.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = path.metadata()?;

        #[cfg(unix)]
        let (mode, owner, group) = {
            use std::os::unix::fs::MetadataExt;
            (
                format_mode(meta.mode(), meta.is_dir()),
                owner_name(meta.uid()),
                group_name(meta.gid()),
            )
        };
        #[cfg(not(unix))]
        let (mode, owner, group) = {
            let mode = if meta.is_dir() {
                "d---------".to_string()
            } else {
                "----------".to_string()
            };
            (mode, String::new(), String::new())
        };

        let modified = meta.modified().ok().map(DateTime::<Local>::from);

        Ok(Self {
            mode,
            owner,
            group,
            size: meta.len(),
            modified,
            is_dir: meta.is_dir(),
        })
    }
}

#[cfg(unix)]
fn owner_name(uid: u32) -> String {
    nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|u| u.name)
        .unwrap_or_else(|| uid.to_string())
}

#[cfg(unix)]
fn group_name(gid: u32) -> String {
    nix::unistd::Group::from_gid(nix::unistd::Gid::from_raw(gid))
        .ok()
        .flatten()
        .map(|g| g.name)
        .unwrap_or_else(|| gid.to_string())
}

/// Format mode bits as a `drwxr-xr-x` string.
pub fn format_mode(mode: u32, is_dir: bool) -> String {
    let mut s = String::with_capacity(10);
    s.push(if is_dir { 'd' } else { '-' });
    let flags = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    for (bit, ch) in flags {
        if mode & bit != 0 {
            s.push(ch);
        } else {
            s.push('-');
        }
    }
    s
}

/// Modification time in `ls -la` style: dates in the current calendar year
/// render as day/month/time, older dates as day/month/year.
pub fn format_mtime(mtime: &DateTime<Local>, now: &DateTime<Local>) -> String {
    if mtime.year() == now.year() {
        mtime.format("%d %b %H:%M").to_string()
    } else {
        mtime.format("%d %b %Y").to_string()
    }
}

/// Format bytes into human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Bottom bar showing metadata for the highlighted entry.
pub struct InfoBarWidget<'a> {
    info: Option<&'a EntryInfo>,
    stat_failed: bool,
    theme: &'a ThemeColors,
}

impl<'a> InfoBarWidget<'a> {
    pub fn new(info: Option<&'a EntryInfo>, stat_failed: bool, theme: &'a ThemeColors) -> Self {
        Self {
            info,
            stat_failed,
            theme,
        }
    }
}

impl Widget for InfoBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.stat_failed {
            let line = Line::from(Span::styled(
                " failed to get file info",
                Style::default().fg(self.theme.error_fg),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let Some(info) = self.info else {
            return;
        };

        let mut spans = vec![
            Span::styled(
                format!(" {}", info.mode),
                Style::default().fg(self.theme.info_mode_fg),
            ),
            Span::styled(
                format!(" {}", info.owner),
                Style::default().fg(self.theme.info_owner_fg),
            ),
            Span::styled(
                format!(" {}", info.group),
                Style::default().fg(self.theme.info_group_fg),
            ),
        ];
        if let Some(ref mtime) = info.modified {
            let now = Local::now();
            spans.push(Span::styled(
                format!(" {}", format_mtime(mtime, &now)),
                Style::default().fg(self.theme.info_mtime_fg),
            ));
        }
        if !info.is_dir {
            spans.push(Span::styled(
                format!(" {}", format_size(info.size)),
                Style::default()
                    .fg(self.theme.info_size_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
