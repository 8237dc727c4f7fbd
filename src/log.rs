use std::fmt::Display;

use anyhow::Context;
use tokio::{sync::mpsc::Sender, task::JoinHandle};

use crate::{ArcPath, fs::Fs};

mod core;
mod data;
mod message;
mod mock;

pub use data::{LogLevel, LogMessage};
use message::Message;

/// The logging actor.
///
/// Every message is appended to a timestamped log file and to `latest.log`
/// inside the configured directory. Messages at or above the configured
/// level are also kept in memory and printed to stderr on [`Log::flush`],
/// after the terminal has been released.
///
/// Each call site tags its messages with a static scope, such as
/// `"app.options"`, so the file can be filtered per subsystem.
///
/// # Examples
/// ```ignore
/// let log = Log::spawn(fs, LogLevel::Warning, 30, log_dir).await?;
/// log.info("app", "Starting");
/// log.flush().await?;
/// ```
#[derive(Debug, Clone)]
pub enum Log {
    /// A real logging actor that writes to files and stderr
    Actual(Sender<Message>),
    /// An in-memory logger whose messages can be inspected by tests
    Mock(mock::Mock),
}

impl Log {
    /// Builds and spawns a logger writing to `log_dir`.
    ///
    /// `max_age` is the number of days a log file is kept by
    /// [`Log::collect_garbage`]. Zero disables the collection.
    pub async fn spawn(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let core = core::Core::build(fs, level, max_age, log_dir)
            .await
            .context("Building the Log actor")?;
        Ok(core.spawn().0)
    }

    /// Creates a mock logger.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Sends a message to the logger without blocking the caller.
    fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let message = LogMessage::new(level, scope, message);
        match self {
            Self::Actual(sender) => {
                let sender = sender.clone();
                tokio::spawn(async move {
                    // A send after a flush is dropped
                    let _ = sender.send(Message::Log(message)).await;
                });
            }
            Self::Mock(mock) => mock.push(message),
        }
    }

    /// Log a message with the `INFO` level
    pub fn info<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Info);
    }

    /// Log a message with the `WARNING` level
    pub fn warn<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Warning);
    }

    /// Log a message with the `ERROR` level
    pub fn error<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Error);
    }

    /// Log an info message if the result is an error and return the result
    /// as is
    pub fn info_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Info);
        }
        result
    }

    /// Log a warning message if the result is an error and return the result
    /// as is
    pub fn warn_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Warning);
        }
        result
    }

    /// Log an error message if the result is an error and return the result
    /// as is
    pub fn error_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Error);
        }
        result
    }

    /// Prints the buffered messages to stderr and stops the actor. Messages
    /// logged afterwards are discarded.
    ///
    /// [`stderr`]: std::io::stderr
    pub fn flush(self) -> JoinHandle<()> {
        match self {
            Self::Actual(sender) => tokio::spawn(async move {
                let _ = sender.send(Message::Flush).await;
            }),
            Self::Mock(_) => tokio::spawn(async {}),
        }
    }

    /// Deletes log files older than the configured maximum age.
    pub async fn collect_garbage(&self) {
        if let Self::Actual(sender) = self {
            let _ = sender.send(Message::CollectGarbage).await;
        }
    }

    /// Messages recorded by a mock logger. Always `None` for a real one.
    pub fn messages(&self) -> Option<Vec<LogMessage>> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(mock) => Some(mock.messages()),
        }
    }
}
