use std::{
    io,
    path::{Component, Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tempfile::TempDir;

use crate::{ArcPath, arc_path};

/// Mock implementation of the Fs actor.
///
/// Uses a temporary directory as the filesystem root, so tests exercise real
/// file semantics without touching anything outside of it. The directory is
/// deleted when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Mock {
    root: Arc<TempDir>,
}

impl Mock {
    /// Creates a mock rooted in a fresh temporary directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir for Fs mock");
        Self {
            root: Arc::new(root),
        }
    }

    /// Maps a virtual path into the temporary directory.
    fn real_path(&self, path: &Path) -> PathBuf {
        let relative: PathBuf = path
            .components()
            .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
            .collect();
        self.root.path().join(relative)
    }

    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        tokio::fs::read_to_string(self.real_path(&path)).await
    }

    pub async fn write(&self, path: ArcPath, contents: String) -> io::Result<()> {
        tokio::fs::write(self.real_path(&path), contents).await
    }

    pub async fn append(&self, path: ArcPath, contents: String) -> io::Result<()> {
        super::core::append(&self.real_path(&path), &contents).await
    }

    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        tokio::fs::create_dir_all(self.real_path(&path)).await
    }

    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        tokio::fs::remove_file(self.real_path(&path)).await
    }

    /// Lists a directory, returning the entries as virtual paths.
    pub async fn read_dir(&self, path: ArcPath) -> io::Result<Vec<ArcPath>> {
        let real = super::core::read_dir(&self.real_path(&path)).await?;
        Ok(real
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| arc_path(path.join(name)))
            .collect())
    }

    pub async fn age(&self, path: ArcPath) -> io::Result<Duration> {
        super::core::age(&self.real_path(&path)).await
    }
}
