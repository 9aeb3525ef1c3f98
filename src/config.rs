//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! One config file is read per run, the first of: the `--config` argument,
//! `$DIRNAV_CONFIG`, the global `~/.config/dirnav/config.toml`. CLI flags
//! override whatever the file set; anything still unset falls back to the
//! built-in defaults baked into the getters.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::nav::listing::DEFAULT_LISTING_LIMIT;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub default_path: Option<String>,
    /// Show hidden files by default.
    pub show_hidden: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Preview panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether the preview panel starts visible.
    pub visible: Option<bool>,
    /// Syntax highlighting theme (syntect theme name).
    pub syntax_theme: Option<String>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    /// Maximum children fetched per directory.
    pub limit: Option<usize>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark" or "light".
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub preview: PreviewConfig,
    pub listing: ListingConfig,
    pub theme: ThemeConfig,
}

// ── Config file resolution ───────────────────────────────────────────────────

/// Pick the single config file for this run.
///
/// An explicit `--config` or `$DIRNAV_CONFIG` path is always returned even if
/// it does not exist (the read failure is worth warning about); the global
/// fallback is only used when the file is actually there.
fn config_file(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("DIRNAV_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("dirnav").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Read and parse a TOML config file, warning on stderr (the TUI is not up
/// yet) when it cannot be used.
fn read_config(path: &Path) -> Option<AppConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Warning: cannot read config {}: {}", path.display(), e);
            return None;
        }
    };
    match toml::from_str(&text) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Warning: cannot parse config {}: {}", path.display(), e);
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

/// The override layer's value when set, else the base layer's.
fn layered<T: Clone>(over: &Option<T>, base: Option<T>) -> Option<T> {
    over.clone().or(base)
}

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: layered(&other.general.default_path, self.general.default_path),
                show_hidden: layered(&other.general.show_hidden, self.general.show_hidden),
                mouse: layered(&other.general.mouse, self.general.mouse),
            },
            preview: PreviewConfig {
                visible: layered(&other.preview.visible, self.preview.visible),
                syntax_theme: layered(&other.preview.syntax_theme, self.preview.syntax_theme),
            },
            listing: ListingConfig {
                limit: layered(&other.listing.limit, self.listing.limit),
            },
            theme: ThemeConfig {
                scheme: layered(&other.theme.scheme, self.theme.scheme),
            },
        }
    }

    /// Load the final configuration: the resolved config file (if any) with
    /// CLI flag overrides merged on top.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = config_file(cli_config_path)
            .and_then(|path| read_config(&path))
            .unwrap_or_default();

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether to show hidden files by default.
    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(false)
    }

    /// Whether the preview panel starts visible.
    pub fn preview_visible(&self) -> bool {
        self.preview.visible.unwrap_or(false)
    }

    /// Syntect theme name for preview highlighting.
    pub fn syntax_theme(&self) -> Option<&str> {
        self.preview.syntax_theme.as_deref()
    }

    /// Maximum children fetched per directory listing.
    pub fn listing_limit(&self) -> usize {
        self.listing.limit.unwrap_or(DEFAULT_LISTING_LIMIT)
    }
}
