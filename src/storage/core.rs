use std::{collections::BTreeMap, io::ErrorKind};

use anyhow::Context;
use tokio::task::JoinHandle;

use super::{MY_SANDWICHES_KEY, Storage, message::Message, update_owned};
use crate::{ArcPath, ArcStr, arc_path, fs::Fs};

/// The core of the Storage actor.
#[derive(Debug)]
pub struct Core {
    fs: Fs,
    path: ArcPath,
    entries: BTreeMap<String, String>,
}

impl Core {
    /// Reads the storage file. A missing file is an empty storage.
    pub async fn load(fs: Fs, path: ArcPath) -> anyhow::Result<Self> {
        let entries = match fs.read_to_string(path.clone()).await {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Parsing storage file {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Reading storage file {}", path.display()));
            }
        };
        Ok(Self { fs, path, entries })
    }

    pub fn spawn(mut self) -> (Storage, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Get { key, tx } => {
                        let value = self.entries.get(&*key).map(|v| ArcStr::from(v.as_str()));
                        let _ = tx.send(value);
                    }
                    Message::Set { key, value, tx } => {
                        self.entries.insert(key.to_string(), value.to_string());
                        let _ = tx.send(self.persist().await);
                    }
                    Message::Remove { key, tx } => {
                        let res = match self.entries.remove(&*key) {
                            Some(_) => self.persist().await,
                            None => Ok(()),
                        };
                        let _ = tx.send(res);
                    }
                    Message::SetOwned { id, owned, tx } => {
                        let _ = tx.send(self.set_owned(id, owned).await);
                    }
                }
            }
        });
        (Storage::Actual(tx), handle)
    }

    async fn set_owned(&mut self, id: i64, owned: bool) -> anyhow::Result<()> {
        let raw = self.entries.get(MY_SANDWICHES_KEY).map(String::as_str);
        let Some(updated) = update_owned(raw, id, owned)? else {
            return Ok(());
        };
        self.entries.insert(MY_SANDWICHES_KEY.to_string(), updated);
        self.persist().await
    }

    async fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            self.fs
                .mkdir(arc_path(parent))
                .await
                .with_context(|| format!("Creating storage directory {}", parent.display()))?;
        }
        let contents = toml::to_string(&self.entries).context("Serializing storage")?;
        self.fs
            .write(self.path.clone(), contents)
            .await
            .with_context(|| format!("Writing storage file {}", self.path.display()))
    }
}
