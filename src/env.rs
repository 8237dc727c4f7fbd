use std::env::VarError;

use anyhow::Context;
use tokio::sync::mpsc::Sender;

use crate::ArcStr;

mod core;
mod message;
mod mock;

use message::Message;

/// Name of the variable that overrides the configured API base URL.
pub const API_URL_VAR: &str = "SANDWICH_HUB_API_URL";

/// The environment actor, a read-mostly view over the process environment.
///
/// # Examples
/// ```ignore
/// let env = Env::spawn();
/// let home = env.env("HOME").await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or the mock reference.
#[derive(Debug, Clone)]
pub enum Env {
    /// A real actor reading the process environment
    Actual(Sender<Message>),
    /// A mock holding variables in memory
    Mock(mock::Mock),
}

impl Env {
    /// Creates a new environment actor.
    pub fn spawn() -> Self {
        let (env, _) = core::Core::new().spawn();
        env
    }

    /// Creates an empty mock environment.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Creates a mock environment pre-populated with `variables`.
    pub fn mock_with<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArcStr>,
        V: Into<ArcStr>,
    {
        Self::Mock(mock::Mock::with_variables(
            variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Reads the variable `key`.
    ///
    /// # Errors
    /// [`VarError::NotPresent`] when unset, [`VarError::NotUnicode`] when the
    /// value is not valid UTF-8.
    pub async fn env(&self, key: impl Into<ArcStr>) -> Result<ArcStr, VarError> {
        let key = key.into();
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::GetEnv { key, tx })
                    .await
                    .context("Sending message to Env actor")
                    .expect("Env actor died");
                rx.await
                    .context("Awaiting response from Env actor")
                    .expect("Env actor died")
            }
            Self::Mock(mock) => mock.env(key).await,
        }
    }

    /// Reads the variable `key`, treating unset and empty values alike.
    pub async fn env_opt(&self, key: impl Into<ArcStr>) -> Option<ArcStr> {
        self.env(key).await.ok().filter(|v| !v.trim().is_empty())
    }
}
