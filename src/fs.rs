use std::{io, time::Duration};

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::ArcPath;

mod core;
mod message;
mod mock;
#[cfg(test)]
mod tests;

use message::Message;

/// The filesystem actor.
///
/// Every file the application touches (configuration, storage, logs) goes
/// through this actor so the whole filesystem can be swapped for a temporary
/// directory in tests.
///
/// # Examples
/// ```ignore
/// let fs = Fs::spawn();
/// fs.write(path.clone(), "hello").await?;
/// assert_eq!(fs.read_to_string(path).await?, "hello");
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or the mock reference.
#[derive(Debug, Clone)]
pub enum Fs {
    /// A real actor operating on the host filesystem
    Actual(Sender<Message>),
    /// A mock rooted in a temporary directory
    Mock(mock::Mock),
}

macro_rules! ask {
    ($sender:expr, $variant:ident { $($field:ident),* }) => {{
        let (tx, rx) = oneshot::channel();
        $sender
            .send(Message::$variant { $($field,)* tx })
            .await
            .context("Sending message to Fs actor")
            .expect("Fs actor died");
        rx.await
            .context("Awaiting response from Fs actor")
            .expect("Fs actor died")
    }};
}

impl Fs {
    /// Creates a new filesystem actor.
    pub fn spawn() -> Self {
        let (fs, _) = core::Core::new().spawn();
        fs
    }

    /// Creates a filesystem mock backed by a fresh temporary directory.
    ///
    /// Absolute paths are re-rooted inside the temporary directory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Reads the whole file at `path` as UTF-8.
    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        match self {
            Self::Actual(sender) => ask!(sender, ReadToString { path }),
            Self::Mock(mock) => mock.read_to_string(path).await,
        }
    }

    /// Replaces the content of the file at `path`, creating it if needed.
    pub async fn write(&self, path: ArcPath, contents: impl Into<String>) -> io::Result<()> {
        let contents = contents.into();
        match self {
            Self::Actual(sender) => ask!(sender, Write { path, contents }),
            Self::Mock(mock) => mock.write(path, contents).await,
        }
    }

    /// Appends `contents` to the file at `path`, creating it if needed.
    pub async fn append(&self, path: ArcPath, contents: impl Into<String>) -> io::Result<()> {
        let contents = contents.into();
        match self {
            Self::Actual(sender) => ask!(sender, Append { path, contents }),
            Self::Mock(mock) => mock.append(path, contents).await,
        }
    }

    /// Creates `path` and all of its missing parents.
    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => ask!(sender, MkDir { path }),
            Self::Mock(mock) => mock.mkdir(path).await,
        }
    }

    /// Removes the file at `path`.
    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => ask!(sender, RemoveFile { path }),
            Self::Mock(mock) => mock.remove_file(path).await,
        }
    }

    /// Lists the entries of the directory at `path`.
    pub async fn read_dir(&self, path: ArcPath) -> io::Result<Vec<ArcPath>> {
        match self {
            Self::Actual(sender) => ask!(sender, ReadDir { path }),
            Self::Mock(mock) => mock.read_dir(path).await,
        }
    }

    /// Time elapsed since the file at `path` was last modified.
    pub async fn age(&self, path: ArcPath) -> io::Result<Duration> {
        match self {
            Self::Actual(sender) => ask!(sender, Age { path }),
            Self::Mock(mock) => mock.age(path).await,
        }
    }
}
