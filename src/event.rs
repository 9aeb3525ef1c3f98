use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

use crate::error::{ListingError, Result};
use crate::nav::preview::PreviewUpdate;

/// A directory child as delivered to the tree view.
///
/// The is_dir classification happens on the worker that produced the listing,
/// so the interactive thread never stats children itself.
#[derive(Debug, Clone)]
pub struct DirChild {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Application events.
///
/// Worker results ride the same channel as input events and arrive in
/// I/O-completion order, not request order; consumers associate them back to
/// requests by key (`DirListed.parent`), generation (`Preview`), or serial
/// (`Suggestion`).
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// A directory listing finished (or failed) for `parent`.
    DirListed {
        parent: PathBuf,
        result: std::result::Result<Vec<DirChild>, ListingError>,
    },
    /// A preview job delivered its result.
    Preview(PreviewUpdate),
    /// A completion was computed for the goto editor input.
    Suggestion { serial: u64, text: Option<String> },
}

/// Async event handler that polls crossterm events and forwards them via a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                // A quiet poll window becomes a tick so the UI can expire
                // transient state even with no input.
                let forwarded = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };
                if let Some(event) = forwarded {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, tx }
    }

    /// Get a sender clone for async tasks to deliver their results.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
