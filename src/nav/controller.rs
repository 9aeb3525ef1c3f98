//! Navigation state machine.
//!
//! The controller is the only owner of mutable navigation state (current
//! root, highlighted entry, preview visibility) and mutates it exclusively on
//! the interactive thread. All I/O runs in the leaf components; the
//! controller only validates, transitions, and fans listing requests out to
//! workers whose results come back as [`Event::DirListed`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::{DirChild, Event};
use crate::nav::listing::ListingCache;
use crate::nav::preview::PreviewEngine;
use crate::nav::resolver;

/// Mutable navigation state. Owned by the controller; nothing else writes it.
pub struct NavigationState {
    root: PathBuf,
    highlighted: Option<PathBuf>,
    preview_visible: bool,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    RootChanged(PathBuf),
    Rejected {
        input: String,
        reason: &'static str,
    },
}

pub struct NavigationController {
    state: NavigationState,
    cache: Arc<ListingCache>,
    previews: PreviewEngine,
    events: mpsc::UnboundedSender<Event>,
    listing_limit: usize,
}

impl NavigationController {
    /// `root` must already be resolved and validated by the caller; an
    /// invalid startup root is fatal before the controller exists.
    pub fn new(
        root: PathBuf,
        cache: Arc<ListingCache>,
        previews: PreviewEngine,
        events: mpsc::UnboundedSender<Event>,
        listing_limit: usize,
    ) -> Self {
        Self {
            state: NavigationState {
                root,
                highlighted: None,
                preview_visible: false,
            },
            cache,
            previews,
            events,
            listing_limit,
        }
    }

    pub fn root(&self) -> &Path {
        &self.state.root
    }

    #[allow(dead_code)]
    pub fn highlighted(&self) -> Option<&Path> {
        self.state.highlighted.as_deref()
    }

    pub fn preview_visible(&self) -> bool {
        self.state.preview_visible
    }

    pub fn cache(&self) -> &Arc<ListingCache> {
        &self.cache
    }

    pub fn previews(&self) -> &PreviewEngine {
        &self.previews
    }

    /// Adopt `raw` as the new root if it resolves to a directory; otherwise
    /// reject without touching current state.
    pub fn navigate_to(&mut self, raw: &str) -> NavOutcome {
        match resolver::resolve(raw) {
            Ok(path) if resolver::is_directory(&path) => {
                self.state.root = path.clone();
                self.state.highlighted = None;
                self.request_listing(&path);
                NavOutcome::RootChanged(path)
            }
            _ => NavOutcome::Rejected {
                input: raw.to_string(),
                reason: "not a directory",
            },
        }
    }

    /// Update the highlighted entry and start its preview, superseding any
    /// outstanding preview job.
    pub fn highlight(&mut self, path: PathBuf) {
        self.previews.request(path.clone());
        self.state.highlighted = Some(path);
    }

    /// Invalidate cached listings for `target` (default: current root) and
    /// re-request them, so the tree re-fetches through the same cache.
    /// Returns the invalidated path for user feedback.
    pub fn reload(&mut self, target: Option<&Path>) -> PathBuf {
        let target = target.unwrap_or(&self.state.root).to_path_buf();
        self.cache.reload(&target);
        self.request_listing(&target);
        target
    }

    /// Flip preview visibility. In-flight preview jobs are unaffected; they
    /// just may not be displayed.
    pub fn toggle_preview(&mut self) -> bool {
        self.state.preview_visible = !self.state.preview_visible;
        self.state.preview_visible
    }

    /// Fetch children of `path` on a worker and post them as `DirListed`.
    pub fn request_listing(&self, path: &Path) {
        let cache = Arc::clone(&self.cache);
        let events = self.events.clone();
        let parent = path.to_path_buf();
        let limit = self.listing_limit;

        tokio::spawn(async move {
            let result = match cache.list(&parent, limit).await {
                Ok(children) => {
                    let Ok(classified) =
                        tokio::task::spawn_blocking(move || classify_children(&children)).await
                    else {
                        return;
                    };
                    Ok(classified)
                }
                Err(e) => Err(e),
            };
            let _ = events.send(Event::DirListed { parent, result });
        });
    }
}

fn classify_children(children: &[PathBuf]) -> Vec<DirChild> {
    children
        .iter()
        .map(|path| DirChild {
            path: path.clone(),
            is_dir: resolver::is_directory(path),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::listing::DEFAULT_LISTING_LIMIT;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn controller(root: &Path) -> (NavigationController, UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cache = Arc::new(ListingCache::new());
        let previews = PreviewEngine::new(tx.clone());
        let controller = NavigationController::new(
            root.to_path_buf(),
            cache,
            previews,
            tx,
            DEFAULT_LISTING_LIMIT,
        );
        (controller, rx)
    }

    async fn next_dir_listed(rx: &mut UnboundedReceiver<Event>) -> (PathBuf, Vec<DirChild>) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for DirListed")
                .expect("event channel closed");
            if let Event::DirListed { parent, result } = event {
                return (parent, result.expect("listing should succeed"));
            }
        }
    }

    #[tokio::test]
    async fn navigating_to_a_file_is_rejected_and_root_unchanged() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap();

        let (mut controller, _rx) = controller(dir.path());
        let outcome = controller.navigate_to(&file.display().to_string());

        assert_eq!(
            outcome,
            NavOutcome::Rejected {
                input: file.display().to_string(),
                reason: "not a directory",
            }
        );
        assert_eq!(controller.root(), dir.path());
    }

    #[tokio::test]
    async fn navigating_to_a_directory_adopts_it_and_lists_it() {
        let old_root = TempDir::new().unwrap();
        let new_root = TempDir::new().unwrap();
        File::create(new_root.path().join("child.txt")).unwrap();

        let (mut controller, mut rx) = controller(old_root.path());
        let outcome = controller.navigate_to(&new_root.path().display().to_string());

        let resolved = new_root.path().canonicalize().unwrap();
        assert_eq!(outcome, NavOutcome::RootChanged(resolved.clone()));
        assert_eq!(controller.root(), resolved);

        let (parent, children) = next_dir_listed(&mut rx).await;
        assert_eq!(parent, resolved);
        assert_eq!(children.len(), 1);
        assert!(!children[0].is_dir);
    }

    #[tokio::test]
    async fn navigating_to_a_missing_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _rx) = controller(dir.path());
        let outcome = controller.navigate_to("/no/such/target");
        assert!(matches!(outcome, NavOutcome::Rejected { .. }));
        assert_eq!(controller.root(), dir.path());
    }

    #[tokio::test]
    async fn reload_invalidates_and_refetches() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a")).unwrap();

        let (mut controller, mut rx) = controller(dir.path());
        controller.request_listing(dir.path());
        let (_, children) = next_dir_listed(&mut rx).await;
        assert_eq!(children.len(), 1);

        File::create(dir.path().join("b")).unwrap();
        let target = controller.reload(None);
        assert_eq!(target, dir.path());

        let (_, children) = next_dir_listed(&mut rx).await;
        assert_eq!(children.len(), 2, "reload must observe fresh contents");
        assert_eq!(controller.cache().io_reads(), 2);
    }

    #[tokio::test]
    async fn highlight_sets_state_and_requests_preview() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "hello").unwrap();

        let (mut controller, mut rx) = controller(dir.path());
        controller.highlight(file.clone());
        assert_eq!(controller.highlighted(), Some(file.as_path()));

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, Event::Preview(_)));
    }

    #[tokio::test]
    async fn toggle_preview_flips_visibility() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _rx) = controller(dir.path());
        assert!(!controller.preview_visible());
        assert!(controller.toggle_preview());
        assert!(!controller.toggle_preview());
    }
}
