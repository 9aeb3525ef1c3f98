//! Terminal lifecycle: raw mode, alternate screen, optional mouse capture.

use std::io::{self, Stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use crate::error::Result;

/// Owns the terminal for the lifetime of the session.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse: bool,
}

impl Tui {
    /// Enter raw mode and the alternate screen, capturing the mouse when
    /// configured.
    pub fn new(mouse: bool) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        if mouse {
            execute!(io::stdout(), EnableMouseCapture)?;
        }
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal, mouse })
    }

    /// Draw one frame.
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Hand the terminal back to the shell.
    pub fn restore(&mut self) -> Result<()> {
        reset_terminal(self.mouse)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Undo everything `Tui::new` set up. Shared with the panic hook, which
/// cannot assume the `Tui` value is still reachable.
fn reset_terminal(mouse: bool) -> io::Result<()> {
    if mouse {
        execute!(io::stdout(), DisableMouseCapture)?;
    }
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Restore the terminal before panic output so the message stays readable.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = reset_terminal(true);
        default_hook(info);
    }));
}
