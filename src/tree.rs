//! Tree view model.
//!
//! Nodes never read the filesystem themselves: children arrive as
//! [`DirChild`] batches from `DirListed` events, produced through the listing
//! cache on worker threads. Expanding an unloaded directory therefore happens
//! in two steps: the caller requests a listing, and the children are applied
//! when the event lands. Listings for directories the user has since
//! collapsed are still applied; they simply stay hidden until re-expanded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::event::DirChild;

/// A node in the directory tree.
#[derive(Debug)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
    pub is_expanded: bool,
    /// Children have been applied at least once (an empty directory is
    /// loaded, an unloaded one is pending a listing).
    pub is_loaded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(path: PathBuf, is_dir: bool, depth: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            path,
            is_dir,
            depth,
            is_expanded: false,
            is_loaded: false,
            children: Vec::new(),
        }
    }
}

/// A flattened representation of a tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    pub is_hidden: bool,
}

/// What a selection movement or expansion asks the caller to do next.
#[derive(Debug, PartialEq, Eq)]
pub enum ExpandAction {
    /// Children already loaded; nothing to fetch.
    Expanded,
    /// The caller should request a listing for this directory.
    NeedsListing(PathBuf),
    /// Selected entry is not an expandable directory.
    None,
}

/// State for the tree view.
pub struct TreeViewState {
    pub root: TreeNode,
    pub flat_entries: Vec<FlatEntry>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub show_hidden: bool,
    /// Directories with a listing request in flight.
    pending: HashSet<PathBuf>,
}

impl TreeViewState {
    /// Create the view model for a new root. The root starts unloaded; the
    /// caller requests its listing and applies the result.
    pub fn new(root_path: PathBuf) -> Self {
        let mut root = TreeNode::new(root_path, true, 0);
        root.is_expanded = true;
        let mut state = Self {
            root,
            flat_entries: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            show_hidden: false,
            pending: HashSet::new(),
        };
        state.flatten();
        state
    }

    /// Swap in a new root (after a successful navigation).
    pub fn set_root(&mut self, root_path: PathBuf) {
        *self = Self::new(root_path);
    }

    /// Apply a finished listing to the node it belongs to.
    ///
    /// Results arrive in I/O-completion order; a listing for a path no longer
    /// in the tree (stale after a root change) is dropped here.
    pub fn apply_children(&mut self, parent: &Path, children: &[DirChild]) {
        self.pending.remove(parent);
        if let Some(node) = Self::find_node_mut(&mut self.root, parent) {
            let depth = node.depth + 1;
            node.children = children
                .iter()
                .map(|c| TreeNode::new(c.path.clone(), c.is_dir, depth))
                .collect();
            sort_children(&mut node.children);
            node.is_loaded = true;
            node.is_expanded = true;
            self.flatten();
        }
    }

    /// Mark an unlistable directory as loaded-and-empty so it is not
    /// re-requested on every expand.
    pub fn apply_listing_failure(&mut self, parent: &Path) {
        self.pending.remove(parent);
        if let Some(node) = Self::find_node_mut(&mut self.root, parent) {
            node.children.clear();
            node.is_loaded = true;
            self.flatten();
        }
    }

    /// Expand the selected directory, or report that it needs a listing.
    pub fn expand_selected(&mut self) -> ExpandAction {
        let Some(entry) = self.flat_entries.get(self.selected_index) else {
            return ExpandAction::None;
        };
        if !entry.is_dir {
            return ExpandAction::None;
        }
        let path = entry.path.clone();
        let Some(node) = Self::find_node_mut(&mut self.root, &path) else {
            return ExpandAction::None;
        };
        if node.is_loaded {
            if !node.is_expanded {
                node.is_expanded = true;
                self.flatten();
            }
            ExpandAction::Expanded
        } else if self.pending.contains(&path) {
            ExpandAction::Expanded
        } else {
            self.pending.insert(path.clone());
            ExpandAction::NeedsListing(path)
        }
    }

    /// Collapse the selected directory, or jump to its parent.
    pub fn collapse_selected(&mut self) {
        let Some(entry) = self.flat_entries.get(self.selected_index) else {
            return;
        };
        let path = entry.path.clone();

        if entry.is_dir && entry.is_expanded && entry.depth > 0 {
            if let Some(node) = Self::find_node_mut(&mut self.root, &path) {
                node.is_expanded = false;
                self.flatten();
            }
            return;
        }

        if let Some(parent) = path.parent() {
            let parent = parent.to_path_buf();
            if let Some(idx) = self.flat_entries.iter().position(|e| e.path == parent) {
                self.selected_index = idx;
            }
        }
    }

    /// Toggle visibility of hidden entries and re-flatten.
    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.flatten();
    }

    /// Path of the currently selected entry.
    pub fn selected_path(&self) -> Option<&Path> {
        self.flat_entries
            .get(self.selected_index)
            .map(|e| e.path.as_path())
    }

    /// Directory to target for a node-scoped reload: the selected directory
    /// itself, or the selected file's parent.
    pub fn reload_target(&self) -> Option<PathBuf> {
        let entry = self.flat_entries.get(self.selected_index)?;
        if entry.is_dir {
            Some(entry.path.clone())
        } else {
            entry.path.parent().map(Path::to_path_buf)
        }
    }

    pub fn select_next(&mut self) {
        let len = self.flat_entries.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        if !self.flat_entries.is_empty() {
            self.selected_index = self.flat_entries.len() - 1;
        }
    }

    /// Update the scroll offset to keep the selected entry visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Rebuild the flat entry list, respecting `show_hidden`.
    /// The root is always included regardless of hidden status.
    fn flatten(&mut self) {
        self.flat_entries.clear();
        Self::flatten_node(&self.root, &mut self.flat_entries, self.show_hidden, true, true);
        if !self.flat_entries.is_empty() && self.selected_index >= self.flat_entries.len() {
            self.selected_index = self.flat_entries.len() - 1;
        }
    }

    fn flatten_node(
        node: &TreeNode,
        entries: &mut Vec<FlatEntry>,
        show_hidden: bool,
        is_last: bool,
        is_root: bool,
    ) {
        let is_hidden = node.name.starts_with('.');
        if !is_root && !show_hidden && is_hidden {
            return;
        }

        entries.push(FlatEntry {
            name: node.name.clone(),
            path: node.path.clone(),
            is_dir: node.is_dir,
            depth: node.depth,
            is_expanded: node.is_expanded,
            is_last_sibling: is_last,
            is_hidden,
        });

        if node.is_expanded {
            let visible: Vec<&TreeNode> = node
                .children
                .iter()
                .filter(|c| show_hidden || !c.name.starts_with('.'))
                .collect();
            for (i, child) in visible.iter().enumerate() {
                let is_last_child = i == visible.len() - 1;
                Self::flatten_node(child, entries, show_hidden, is_last_child, false);
            }
        }
    }

    fn find_node_mut<'a>(node: &'a mut TreeNode, target: &Path) -> Option<&'a mut TreeNode> {
        if node.path == target {
            return Some(node);
        }
        for child in node.children.iter_mut() {
            if let Some(found) = Self::find_node_mut(child, target) {
                return Some(found);
            }
        }
        None
    }
}

/// Directories first, then case-insensitive name order, for display only;
/// the cache keeps filesystem iteration order.
fn sort_children(children: &mut [TreeNode]) {
    children.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(path: &str, is_dir: bool) -> DirChild {
        DirChild {
            path: PathBuf::from(path),
            is_dir,
        }
    }

    fn loaded_root() -> TreeViewState {
        let mut state = TreeViewState::new(PathBuf::from("/root"));
        state.apply_children(
            Path::new("/root"),
            &[
                child("/root/beta", true),
                child("/root/alpha", true),
                child("/root/notes.txt", false),
                child("/root/.hidden", false),
            ],
        );
        state
    }

    #[test]
    fn new_root_starts_unloaded_with_single_entry() {
        let state = TreeViewState::new(PathBuf::from("/root"));
        assert_eq!(state.flat_entries.len(), 1);
        assert!(!state.root.is_loaded);
    }

    #[test]
    fn applied_children_are_flattened_dirs_first_sorted() {
        let state = loaded_root();
        let names: Vec<&str> = state.flat_entries.iter().map(|e| e.name.as_str()).collect();
        // Hidden entries are filtered by default.
        assert_eq!(names, vec!["root", "alpha", "beta", "notes.txt"]);
    }

    #[test]
    fn toggle_hidden_reveals_dotfiles() {
        let mut state = loaded_root();
        state.toggle_hidden();
        let names: Vec<&str> = state.flat_entries.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&".hidden"));
        state.toggle_hidden();
        let names: Vec<&str> = state.flat_entries.iter().map(|e| e.name.as_str()).collect();
        assert!(!names.contains(&".hidden"));
    }

    #[test]
    fn expanding_unloaded_directory_requests_listing_once() {
        let mut state = loaded_root();
        state.selected_index = 1; // alpha
        assert_eq!(
            state.expand_selected(),
            ExpandAction::NeedsListing(PathBuf::from("/root/alpha"))
        );
        // A second expand while the request is in flight fetches nothing new.
        assert_eq!(state.expand_selected(), ExpandAction::Expanded);
    }

    #[test]
    fn expanding_a_file_is_a_noop() {
        let mut state = loaded_root();
        state.selected_index = 3; // notes.txt
        assert_eq!(state.expand_selected(), ExpandAction::None);
    }

    #[test]
    fn applied_children_expand_the_requested_node() {
        let mut state = loaded_root();
        state.selected_index = 1;
        state.expand_selected();
        state.apply_children(
            Path::new("/root/alpha"),
            &[child("/root/alpha/inner.txt", false)],
        );

        let names: Vec<&str> = state.flat_entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["root", "alpha", "inner.txt", "beta", "notes.txt"]);
        let inner = &state.flat_entries[2];
        assert_eq!(inner.depth, 2);
    }

    #[test]
    fn stale_listing_for_unknown_parent_is_dropped() {
        let mut state = loaded_root();
        let before = state.flat_entries.len();
        state.apply_children(Path::new("/elsewhere"), &[child("/elsewhere/x", false)]);
        assert_eq!(state.flat_entries.len(), before);
    }

    #[test]
    fn collapse_hides_children_and_second_collapse_jumps_to_parent() {
        let mut state = loaded_root();
        state.selected_index = 1;
        state.expand_selected();
        state.apply_children(
            Path::new("/root/alpha"),
            &[child("/root/alpha/inner.txt", false)],
        );

        state.selected_index = 1; // alpha, expanded
        state.collapse_selected();
        let names: Vec<&str> = state.flat_entries.iter().map(|e| e.name.as_str()).collect();
        assert!(!names.contains(&"inner.txt"));

        state.selected_index = 3; // notes.txt (a file)
        state.collapse_selected();
        assert_eq!(state.selected_path(), Some(Path::new("/root")));
    }

    #[test]
    fn listing_failure_marks_node_loaded_and_empty() {
        let mut state = loaded_root();
        state.selected_index = 1;
        assert!(matches!(
            state.expand_selected(),
            ExpandAction::NeedsListing(_)
        ));
        state.apply_listing_failure(Path::new("/root/alpha"));
        // Unavailable directory behaves as empty; no endless re-requests.
        assert_eq!(state.expand_selected(), ExpandAction::Expanded);
    }

    #[test]
    fn selection_is_clamped_after_shrinking() {
        let mut state = loaded_root();
        state.select_last();
        let last = state.selected_index;
        state.apply_children(Path::new("/root"), &[child("/root/only", true)]);
        assert!(state.selected_index < last);
        assert!(state.selected_index < state.flat_entries.len());
    }

    #[test]
    fn selection_movement_stays_in_bounds() {
        let mut state = loaded_root();
        state.select_previous();
        assert_eq!(state.selected_index, 0);
        state.select_last();
        state.select_next();
        assert_eq!(state.selected_index, state.flat_entries.len() - 1);
        state.select_first();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn reload_target_is_dir_itself_or_file_parent() {
        let mut state = loaded_root();
        state.selected_index = 1; // alpha (dir)
        assert_eq!(state.reload_target(), Some(PathBuf::from("/root/alpha")));
        state.selected_index = 3; // notes.txt
        assert_eq!(state.reload_target(), Some(PathBuf::from("/root")));
    }

    #[test]
    fn update_scroll_follows_selection() {
        let mut state = loaded_root();
        state.select_last();
        state.update_scroll(2);
        assert!(state.selected_index >= state.scroll_offset);
        assert!(state.selected_index < state.scroll_offset + 2);
        state.select_first();
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 0);
    }
}
