use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that abort the session.
///
/// Everything recoverable (unreadable directory, unreadable preview target,
/// rejected navigation) is a typed outcome on its component, not an
/// `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/teardown or event delivery broke down.
    #[error("terminal failure: {0}")]
    Terminal(String),

    /// The startup root did not resolve to a browsable directory.
    #[error("cannot browse {0}: not a directory")]
    InvalidPath(String),
}

/// A directory could not be listed.
///
/// The listing cache never stores a failed result; callers treat the
/// directory as empty/unavailable rather than aborting the navigation flow.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("cannot read directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ListingError {
    /// The directory the failed listing was for.
    #[allow(dead_code)]
    pub fn path(&self) -> &PathBuf {
        match self {
            ListingError::Unreadable { path, .. } => path,
        }
    }
}
