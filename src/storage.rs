use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcPath, ArcStr, fs::Fs};

mod core;
mod message;
mod mock;
#[cfg(test)]
mod tests;

use message::Message;

/// Storage key of the bearer token issued on login.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key of the JSON array of sandwich ids created on this machine.
pub const MY_SANDWICHES_KEY: &str = "my_sandwiches";

/// Persistent key/value storage.
///
/// Values survive restarts in a small TOML file. Every change is written
/// through immediately.
#[derive(Debug, Clone)]
pub enum Storage {
    Actual(Sender<Message>),
    Mock(mock::Mock),
}

impl Storage {
    /// Spawns a storage actor backed by the file at `path`, loading what it
    /// already holds.
    pub async fn spawn(fs: Fs, path: ArcPath) -> anyhow::Result<Self> {
        let core = core::Core::load(fs, path)
            .await
            .context("Loading persistent storage")?;
        Ok(core.spawn().0)
    }

    /// Creates an empty in-memory storage.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::default())
    }

    async fn ask<T>(sender: &Sender<Message>, msg: impl FnOnce(oneshot::Sender<T>) -> Message) -> T {
        let (tx, rx) = oneshot::channel();
        sender
            .send(msg(tx))
            .await
            .context("Sending message to Storage actor")
            .expect("Storage actor died");
        rx.await
            .context("Awaiting response from Storage actor")
            .expect("Storage actor died")
    }

    /// Reads a value.
    ///
    /// # Arguments
    /// * `key` - The storage key, e.g. [`TOKEN_KEY`]
    ///
    /// # Returns
    /// The stored value, or `None` when the key was never set.
    pub async fn get(&self, key: &str) -> Option<ArcStr> {
        let key = ArcStr::from(key);
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Get { key, tx }).await,
            Self::Mock(mock) => mock.get(&key),
        }
    }

    /// Stores `value` under `key` and writes the file through.
    ///
    /// # Returns
    /// An error if the storage file could not be written. The value is kept
    /// in memory either way.
    pub async fn set(&self, key: &str, value: impl Into<ArcStr>) -> anyhow::Result<()> {
        let key = ArcStr::from(key);
        let value = value.into();
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Set { key, value, tx }).await,
            Self::Mock(mock) => {
                mock.set(key, value);
                Ok(())
            }
        }
    }

    /// Deletes `key`. Removing a key that is not there is not an error.
    pub async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let key = ArcStr::from(key);
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Remove { key, tx }).await,
            Self::Mock(mock) => {
                mock.remove(&key);
                Ok(())
            }
        }
    }

    /// Ids of the sandwiches created from this machine. A missing or
    /// malformed entry reads as empty.
    pub async fn owned_sandwiches(&self) -> Vec<i64> {
        parse_owned(self.get(MY_SANDWICHES_KEY).await.as_deref())
    }

    /// Whether sandwich `id` was created from this machine.
    pub async fn owns_sandwich(&self, id: i64) -> bool {
        self.owned_sandwiches().await.contains(&id)
    }

    /// Adds or drops `id` from the owned list in a single step, so
    /// concurrent updates never lose each other.
    ///
    /// # Arguments
    /// * `id` - The sandwich id
    /// * `owned` - Whether `id` should be in the list afterwards
    pub async fn set_owned(&self, id: i64, owned: bool) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                Self::ask(sender, |tx| Message::SetOwned { id, owned, tx }).await
            }
            Self::Mock(mock) => mock.set_owned(id, owned),
        }
    }

    /// Records `id` as created from this machine. Recording it twice keeps
    /// a single entry.
    pub async fn remember_sandwich(&self, id: i64) -> anyhow::Result<()> {
        self.set_owned(id, true).await
    }

    /// Drops `id` from the owned list, e.g. after deleting it.
    pub async fn forget_sandwich(&self, id: i64) -> anyhow::Result<()> {
        self.set_owned(id, false).await
    }
}

fn parse_owned(raw: Option<&str>) -> Vec<i64> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

/// Applies an ownership change to the raw owned list. Returns the new raw
/// list, or `None` when it stays the same.
fn update_owned(raw: Option<&str>, id: i64, owned: bool) -> anyhow::Result<Option<String>> {
    let mut ids = parse_owned(raw);
    match (owned, ids.contains(&id)) {
        (true, false) => ids.push(id),
        (false, true) => ids.retain(|other| *other != id),
        _ => return Ok(None),
    }
    let raw = serde_json::to_string(&ids).context("Serializing owned sandwiches")?;
    Ok(Some(raw))
}
