//! Path resolution: home-directory expansion, canonicalization, and
//! directory checks.
//!
//! `resolve` is synchronous; the underlying metadata calls may block, so bulk
//! work goes through the worker-backed listing cache and callers on the
//! interactive thread only use it for single-path validation.

use std::io;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Only the home-token forms `~` and `~/rest` are expanded; `~user` syntax is
/// not supported and passes through unchanged.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Resolve a raw path string to an absolute, symlink-resolved location.
///
/// Fails if the path does not exist; callers decide whether that is fatal
/// (startup root) or a normal outcome (suggestion parent, navigation target).
pub fn resolve(raw: &str) -> io::Result<PathBuf> {
    expand_home(raw).canonicalize()
}

/// Whether `path` currently denotes a directory.
///
/// Fails closed: any access error reports `false` rather than propagating.
pub fn is_directory(path: &Path) -> bool {
    path.metadata().map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn expand_home_bare_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~"), home);
    }

    #[test]
    fn expand_home_with_suffix() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~/projects"), home.join("projects"));
    }

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn resolve_normalizes_dot_dot() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();
        let raw = format!("{}/a/..", dir.path().display());
        let resolved = resolve(&raw).unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn resolve_missing_path_errors() {
        assert!(resolve("/definitely/not/a/real/path").is_err());
    }

    #[test]
    fn is_directory_true_for_dir() {
        let dir = TempDir::new().unwrap();
        assert!(is_directory(dir.path()));
    }

    #[test]
    fn is_directory_false_for_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        File::create(&file).unwrap();
        assert!(!is_directory(&file));
    }

    #[test]
    fn is_directory_fails_closed_on_missing_path() {
        assert!(!is_directory(Path::new("/no/such/place")));
    }
}
