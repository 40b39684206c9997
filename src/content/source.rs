//! Content sources.
//!
//! The loader and catalog manager read file text only through a
//! [`ContentSource`], which keeps disk access in one place and lets tests
//! count or fake reads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

/// Reads the text of a content file.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Returns the full text of `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    async fn read(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads content from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

#[async_trait]
impl ContentSource for FsSource {
    async fn read(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// In-memory source that counts reads.
///
/// Useful for custom resolvers that synthesize content and for tests that
/// check memoization.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
    reads: AtomicUsize,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, builder style.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Number of `read` calls so far, including failed ones.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn read(&self, path: &Path) -> std::io::Result<String> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}
