mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod nav;
mod theme;
mod tree;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, ListingConfig, PreviewConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::nav::resolver;
use crate::tui::{install_panic_hook, Tui};

/// A terminal-based directory browser TUI.
#[derive(Parser, Debug)]
#[command(name = "dirnav", version, about)]
struct Cli {
    /// Root directory to browse (defaults to the current directory)
    path: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show hidden files
    #[arg(long)]
    show_hidden: bool,

    /// Start with the preview panel visible
    #[arg(long)]
    preview: bool,

    /// Color scheme: "dark" or "light"
    #[arg(long)]
    theme: Option<String>,
}

impl Cli {
    /// CLI flags expressed as a partial config for merging.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: None,
                show_hidden: self.show_hidden.then_some(true),
                mouse: None,
            },
            preview: PreviewConfig {
                visible: self.preview.then_some(true),
                syntax_theme: None,
            },
            listing: ListingConfig { limit: None },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    // CLI positional wins over the config's default path.
    let raw_root = cli
        .path
        .or_else(|| config.general.default_path.clone())
        .unwrap_or_else(|| ".".to_string());

    // An invalid root is fatal: there is nothing to browse.
    let root = resolver::resolve(&raw_root)
        .ok()
        .filter(|p| resolver::is_directory(p))
        .ok_or(error::AppError::InvalidPath(raw_root))?;

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let mut app = App::new(root, &config, events.sender());

    loop {
        tui.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(_) => {}
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::DirListed { parent, result } => app.on_dir_listed(parent, result),
            Event::Preview(update) => app.on_preview(update),
            Event::Suggestion { serial, text } => app.on_suggestion(serial, text),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
