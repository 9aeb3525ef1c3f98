//! Theme data model: built-in palettes and resolution from config.

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub tree_hidden_fg: Color,

    // Path display / status line
    pub path_fg: Color,
    pub status_fg: Color,

    // Info bar fields, `ls -la` style
    pub info_mode_fg: Color,
    pub info_owner_fg: Color,
    pub info_group_fg: Color,
    pub info_mtime_fg: Color,
    pub info_size_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors
    pub error_fg: Color,
    pub success_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        tree_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        tree_file_fg: Color::Rgb(205, 214, 244),     // #cdd6f4
        tree_hidden_fg: Color::Rgb(108, 112, 134),   // #6c7086 (overlay0)

        path_fg: Color::Rgb(166, 227, 161),   // #a6e3a1 (green)
        status_fg: Color::Rgb(205, 214, 244), // #cdd6f4

        info_mode_fg: Color::Rgb(243, 139, 168),  // #f38ba8 (red)
        info_owner_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_group_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        info_mtime_fg: Color::Rgb(137, 220, 235), // #89dceb (sky)
        info_size_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)

        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme — complementary light palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_selected_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),
        tree_dir_fg: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
        tree_file_fg: Color::Rgb(76, 79, 105),
        tree_hidden_fg: Color::Rgb(156, 160, 176),    // #9ca0b0 (overlay0)

        path_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        status_fg: Color::Rgb(76, 79, 105),

        info_mode_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        info_owner_fg: Color::Rgb(64, 160, 43),   // #40a02b (green)
        info_group_fg: Color::Rgb(223, 142, 29),  // #df8e1d (yellow)
        info_mtime_fg: Color::Rgb(4, 165, 229),   // #04a5e5 (sky)
        info_size_fg: Color::Rgb(136, 57, 239),   // #8839ef (mauve)

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),   // #d20f39 (red)
        success_fg: Color::Rgb(64, 160, 43), // #40a02b (green)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref() {
        Some("light") => light_theme(),
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}
