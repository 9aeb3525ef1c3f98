//! Prefix-based path autocompletion for the goto editor.
//!
//! A suggestion is the shortest directory child of the typed path's parent
//! whose name starts (case-insensitively) with the final typed segment,
//! rendered with a trailing separator. Listing goes through the shared
//! [`ListingCache`], so completions reuse whatever the tree has already
//! fetched. No match, or an unlistable parent, is a normal `None` outcome.

use std::path::PathBuf;
use std::sync::Arc;

use crate::nav::listing::{ListingCache, DEFAULT_LISTING_LIMIT};
use crate::nav::resolver;

/// Children considered per completion request.
pub const SUGGEST_LIMIT: usize = DEFAULT_LISTING_LIMIT;

/// Computes a single best autocompletion for a partially typed path.
pub struct Suggester {
    cache: Arc<ListingCache>,
}

impl Suggester {
    pub fn new(cache: Arc<ListingCache>) -> Self {
        Self { cache }
    }

    /// Suggest the closest matching directory for `partial`, or `None`.
    pub async fn suggest(&self, partial: &str) -> Option<String> {
        if partial.is_empty() {
            return None;
        }

        let (parent_raw, name_prefix) = split_partial(partial);

        // A partial that already denotes a directory is its own parent; the
        // final segment still acts as the match prefix.
        let parent = match resolver::resolve(partial) {
            Ok(p) if resolver::is_directory(&p) => p,
            _ => resolver::resolve(parent_raw).ok()?,
        };

        let children = self.cache.list(&parent, SUGGEST_LIMIT).await.ok()?;

        // Filtering stats every candidate; keep it off the runtime threads.
        let prefix = name_prefix.to_lowercase();
        let best = tokio::task::spawn_blocking(move || shortest_match(&children, &prefix))
            .await
            .ok()??;

        Some(rewrite_home(best, partial, dirs::home_dir()))
    }
}

/// Shortest candidate path string wins; ties go to first encountered in
/// filesystem iteration order.
fn shortest_match(children: &[PathBuf], prefix: &str) -> Option<String> {
    let mut best: Option<String> = None;
    for child in children {
        let name = match child.file_name() {
            Some(n) => n.to_string_lossy(),
            None => continue,
        };
        if !name.to_lowercase().starts_with(prefix) {
            continue;
        }
        if !resolver::is_directory(child) {
            continue;
        }
        let candidate = format!("{}/", child.display());
        let better = match &best {
            Some(current) => candidate.len() < current.len(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Split a typed path into its directory portion and final segment.
/// Trailing separators are ignored, matching what a path-library `name`
/// lookup would report.
fn split_partial(partial: &str) -> (&str, &str) {
    let trimmed = partial.trim_end_matches('/');
    if trimmed.is_empty() {
        return ("/", "");
    }
    match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => (".", trimmed),
    }
}

/// If the user typed the home token, present the suggestion in the same
/// form. Single substring replacement, not recursive.
fn rewrite_home(suggestion: String, partial: &str, home: Option<PathBuf>) -> String {
    if !partial.contains('~') {
        return suggestion;
    }
    match home {
        Some(home) => suggestion.replacen(home.to_string_lossy().as_ref(), "~", 1),
        None => suggestion,
    }
}
