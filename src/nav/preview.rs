//! Cancellable, size-bounded file preview jobs.
//!
//! One preview is "current" at a time. Every request bumps a shared
//! generation counter; the spawned job re-checks that counter after the read
//! and again before delivery, and the applier compares once more before
//! mutating visible state. A superseded job may finish computing, but its
//! result is never applied.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::Event;

/// Leading bytes read per preview.
pub const PREVIEW_READ_CAP: u64 = 32 * 1024;

/// Advisory syntax classification for downstream highlighting.
///
/// The engine only decides what to resolve BY; the preview widget resolves
/// the hint against its loaded syntax set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxHint {
    /// The filename carried an extension.
    Extension(String),
    /// Extensionless, but the content opens with a shebang line.
    FirstLine(String),
    /// Nothing to go on; plain text.
    Plain,
}

/// Outcome of a preview job.
///
/// `Binary` and `Unavailable` are distinct states (undecodable content vs.
/// I/O failure) with the same external effect: a placeholder, never an error
/// notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    Text {
        text: String,
        syntax: SyntaxHint,
    },
    Binary,
    Unavailable,
    /// The target is not a regular file (directory, socket, missing).
    NotFile,
}

/// A finished preview job, tagged with the generation it was issued under.
#[derive(Debug)]
pub struct PreviewUpdate {
    pub path: PathBuf,
    pub generation: u64,
    pub content: PreviewContent,
}

/// Spawns preview jobs and owns the supersession counter.
pub struct PreviewEngine {
    generation: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<Event>,
}

impl PreviewEngine {
    pub fn new(events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            events,
        }
    }

    /// Generation of the most recent request. An update is applied only if
    /// its generation still matches.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a preview for `path`, superseding any outstanding request.
    pub fn request(&self, path: PathBuf) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let events = self.events.clone();

        tokio::spawn(async move {
            let read_path = path.clone();
            let loaded =
                match tokio::task::spawn_blocking(move || load_leading_bytes(&read_path)).await {
                    Ok(loaded) => loaded,
                    Err(_) => return,
                };

            if current.load(Ordering::SeqCst) != generation {
                return;
            }

            let content = match loaded {
                Loaded::NotFile => PreviewContent::NotFile,
                Loaded::Failed => PreviewContent::Unavailable,
                Loaded::Bytes(bytes) => decode_and_classify(&path, bytes),
            };

            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            let _ = events.send(Event::Preview(PreviewUpdate {
                path,
                generation,
                content,
            }));
        });
    }
}

enum Loaded {
    NotFile,
    Failed,
    Bytes(Vec<u8>),
}

/// Read at most [`PREVIEW_READ_CAP`] bytes of leading content.
fn load_leading_bytes(path: &Path) -> Loaded {
    match path.metadata() {
        Ok(meta) if meta.is_file() => {}
        _ => return Loaded::NotFile,
    }
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return Loaded::Failed,
    };
    let mut bytes = Vec::new();
    match file.take(PREVIEW_READ_CAP).read_to_end(&mut bytes) {
        Ok(_) => Loaded::Bytes(bytes),
        Err(_) => Loaded::Failed,
    }
}

/// Decode as UTF-8 and classify; NUL bytes or invalid UTF-8 mean binary.
fn decode_and_classify(path: &Path, bytes: Vec<u8>) -> PreviewContent {
    if bytes.contains(&0) {
        return PreviewContent::Binary;
    }
    match String::from_utf8(bytes) {
        Ok(text) => {
            let syntax = classify_syntax(path, &text);
            PreviewContent::Text { text, syntax }
        }
        Err(_) => PreviewContent::Binary,
    }
}

/// Classify a file for highlighting: by extension when there is one, by the
/// shebang line for extensionless scripts, plain text otherwise.
pub fn classify_syntax(path: &Path, content: &str) -> SyntaxHint {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return SyntaxHint::Extension(ext.to_ascii_lowercase());
    }
    match content.lines().next() {
        Some(first) if first.starts_with("#!") => SyntaxHint::FirstLine(first.to_string()),
        _ => SyntaxHint::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn classify_by_extension() {
        assert_eq!(
            classify_syntax(Path::new("foo.rs"), ""),
            SyntaxHint::Extension("rs".into())
        );
        assert_eq!(
            classify_syntax(Path::new("BAR.PY"), ""),
            SyntaxHint::Extension("py".into()),
            "extensions are matched case-insensitively"
        );
    }

    #[test]
    fn classify_by_shebang_when_extensionless() {
        assert_eq!(
            classify_syntax(Path::new("script"), "#!/usr/bin/env python3\nprint()"),
            SyntaxHint::FirstLine("#!/usr/bin/env python3".into())
        );
        assert_eq!(
            classify_syntax(Path::new("data"), "just some text"),
            SyntaxHint::Plain
        );
    }

    #[test]
    fn nul_bytes_classify_as_binary() {
        let content = decode_and_classify(Path::new("a.dat"), vec![0x00, 0x01, 0x02]);
        assert_eq!(content, PreviewContent::Binary);
    }

    #[test]
    fn invalid_utf8_classifies_as_binary() {
        let content = decode_and_classify(Path::new("a.txt"), vec![0xFF, 0xFE, 0x61]);
        assert_eq!(content, PreviewContent::Binary);
    }

    #[test]
    fn utf8_text_keeps_its_classification() {
        let content = decode_and_classify(Path::new("lib.rs"), b"fn main() {}".to_vec());
        match content {
            PreviewContent::Text { text, syntax } => {
                assert_eq!(text, "fn main() {}");
                assert_eq!(syntax, SyntaxHint::Extension("rs".into()));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load_leading_bytes(dir.path()), Loaded::NotFile));
    }

    #[test]
    fn missing_path_is_not_a_file() {
        assert!(matches!(
            load_leading_bytes(Path::new("/no/such/file")),
            Loaded::NotFile
        ));
    }

    #[test]
    fn read_is_capped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&vec![b'a'; PREVIEW_READ_CAP as usize + 4096])
            .unwrap();

        match load_leading_bytes(&path) {
            Loaded::Bytes(bytes) => assert_eq!(bytes.len(), PREVIEW_READ_CAP as usize),
            _ => panic!("expected bytes"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn superseded_preview_is_never_applied() {
        let dir = TempDir::new().unwrap();
        let path_a = dir.path().join("a.txt");
        let path_b = dir.path().join("b.txt");
        std::fs::write(&path_a, "content a").unwrap();
        std::fs::write(&path_b, "content b").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = PreviewEngine::new(tx);

        engine.request(path_a.clone());
        engine.request(path_b.clone());

        let mut applied = None;
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_secs(2), rx.recv()).await
        {
            let Event::Preview(update) = event else {
                continue;
            };
            // The applier's check: stale generations are dropped.
            if update.generation != engine.current_generation() {
                assert_eq!(update.path, path_a, "only A may arrive stale");
                continue;
            }
            applied = Some(update);
            break;
        }

        let applied = applied.expect("current-generation preview should arrive");
        assert_eq!(applied.path, path_b);
        match applied.content {
            PreviewContent::Text { ref text, .. } => assert_eq!(text, "content b"),
            ref other => panic!("expected text, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn preview_of_directory_reports_not_file() {
        let dir = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = PreviewEngine::new(tx);

        engine.request(dir.path().to_path_buf());

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            Event::Preview(update) => assert_eq!(update.content, PreviewContent::NotFile),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
