use std::{io, path::Path, time::Duration};

use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::mpsc, task::JoinHandle};

use super::{Fs, message::Message};
use crate::{ArcPath, arc_path};

/// The core of the Fs actor, a thin layer over `tokio::fs`.
///
/// Operations run one after the other in the actor task, so two writes to
/// the same file never interleave.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn spawn(self) -> (Fs, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                use Message::*;
                match msg {
                    ReadToString { path, tx } => {
                        let _ = tx.send(tokio::fs::read_to_string(&path).await);
                    }
                    Write { path, contents, tx } => {
                        let _ = tx.send(tokio::fs::write(&path, contents).await);
                    }
                    Append { path, contents, tx } => {
                        let _ = tx.send(append(&path, &contents).await);
                    }
                    MkDir { path, tx } => {
                        let _ = tx.send(tokio::fs::create_dir_all(&path).await);
                    }
                    RemoveFile { path, tx } => {
                        let _ = tx.send(tokio::fs::remove_file(&path).await);
                    }
                    ReadDir { path, tx } => {
                        let _ = tx.send(read_dir(&path).await);
                    }
                    Age { path, tx } => {
                        let _ = tx.send(age(&path).await);
                    }
                }
            }
        });
        (Fs::Actual(tx), handle)
    }
}

pub(super) async fn append(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}

pub(super) async fn read_dir(path: &Path) -> io::Result<Vec<ArcPath>> {
    let mut entries = Vec::new();
    let mut rd = tokio::fs::read_dir(path).await?;
    while let Some(entry) = rd.next_entry().await? {
        entries.push(arc_path(entry.path()));
    }
    Ok(entries)
}

pub(super) async fn age(path: &Path) -> io::Result<Duration> {
    let modified = tokio::fs::metadata(path).await?.modified()?;
    Ok(modified.elapsed().unwrap_or_default())
}
