use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcPath, ArcStr, fs::Fs, log::LogLevel};

mod core;
mod data;
mod message;
mod mock;

pub use data::{Data, PathOpt, StrOpt, USizeOpt};
use message::Message;

/// The configuration actor.
///
/// Holds the values read from `config.toml`. Missing files and missing keys
/// fall back to defaults, so a fresh install works without any setup.
///
/// # Examples
/// ```ignore
/// let config = Config::spawn(fs, config_path);
/// config.load().await?;
/// let base_url = config.str(StrOpt::ApiBaseUrl).await;
/// ```
#[derive(Debug, Clone)]
pub enum Config {
    /// A real configuration actor backed by a TOML file
    Actual(Sender<Message>),
    /// An in-memory configuration for tests
    Mock(mock::Mock),
}

impl Config {
    /// Spawns a configuration actor reading and writing the file at `path`.
    pub fn spawn(fs: Fs, path: ArcPath) -> Self {
        let (config, _) = core::Core::new(fs, path).spawn();
        config
    }

    /// Creates a mock configuration holding `data`.
    pub fn mock(data: Data) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    async fn ask<T>(sender: &Sender<Message>, msg: impl FnOnce(oneshot::Sender<T>) -> Message) -> T {
        let (tx, rx) = oneshot::channel();
        sender
            .send(msg(tx))
            .await
            .context("Sending message to Config actor")
            .expect("Config actor died");
        rx.await
            .context("Awaiting response from Config actor")
            .expect("Config actor died")
    }

    /// Loads the configuration file. A missing file leaves the defaults in
    /// place.
    pub async fn load(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Load { tx }).await,
            Self::Mock(_) => Ok(()),
        }
    }

    /// Writes the current configuration, creating the parent directory.
    pub async fn save(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Save { tx }).await,
            Self::Mock(_) => Ok(()),
        }
    }

    /// Gets a path option.
    ///
    /// # Arguments
    /// * `opt` - The path option to read
    ///
    /// # Returns
    /// The configured path.
    pub async fn path(&self, opt: PathOpt) -> ArcPath {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::GetPath { opt, tx }).await,
            Self::Mock(mock) => mock.data().path(opt),
        }
    }

    /// Sets a path option in memory. Call [`Config::save`] to persist it.
    ///
    /// # Arguments
    /// * `opt` - The path option to set
    /// * `path` - The new path
    pub async fn set_path(&self, opt: PathOpt, path: ArcPath) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetPath { opt, path }).await;
            }
            Self::Mock(mock) => mock.update(|data| data.set_path(opt, path)),
        }
    }

    /// Gets the minimum level written to the log file.
    pub async fn log_level(&self) -> LogLevel {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::GetLogLevel { tx }).await,
            Self::Mock(mock) => mock.data().log_level(),
        }
    }

    /// Sets the minimum level written to the log file.
    pub async fn set_log_level(&self, level: LogLevel) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetLogLevel { level }).await;
            }
            Self::Mock(mock) => mock.update(|data| data.set_log_level(level)),
        }
    }

    /// Gets a numeric option.
    ///
    /// # Arguments
    /// * `opt` - The numeric option to read
    ///
    /// # Returns
    /// The value. Timeouts are in seconds, `MaxAge` in days.
    pub async fn usize(&self, opt: USizeOpt) -> usize {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::GetUSize { opt, tx }).await,
            Self::Mock(mock) => mock.data().usize(opt),
        }
    }

    /// Sets a numeric option in memory.
    ///
    /// # Arguments
    /// * `opt` - The numeric option to set
    /// * `value` - The new value
    pub async fn set_usize(&self, opt: USizeOpt, value: usize) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetUSize { opt, value }).await;
            }
            Self::Mock(mock) => mock.update(|data| data.set_usize(opt, value)),
        }
    }

    /// Gets a string option.
    ///
    /// # Arguments
    /// * `opt` - The string option to read
    pub async fn str(&self, opt: StrOpt) -> ArcStr {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::GetStr { opt, tx }).await,
            Self::Mock(mock) => mock.data().str(opt),
        }
    }

    /// Sets a string option in memory.
    ///
    /// # Arguments
    /// * `opt` - The string option to set
    /// * `value` - The new value
    pub async fn set_str(&self, opt: StrOpt, value: ArcStr) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetStr { opt, value }).await;
            }
            Self::Mock(mock) => mock.update(|data| data.set_str(opt, value)),
        }
    }
}
