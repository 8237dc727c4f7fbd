use std::env::VarError;

use tokio::task::JoinHandle;

use super::{Env, message::Message};
use crate::ArcStr;

/// The core of the Env actor.
///
/// Reads go through a single task so tests can swap the whole environment
/// for [`Env::mock`] without touching the process globals.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn new() -> Self {
        Default::default()
    }

    /// Transforms the core into an actor ready to receive messages.
    pub fn spawn(self) -> (Env, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::GetEnv { key, tx } => {
                        let _ = tx.send(Self::get_env(&key));
                    }
                }
            }
        });

        (Env::Actual(tx), handle)
    }

    fn get_env(key: &str) -> Result<ArcStr, VarError> {
        std::env::var(key).map(ArcStr::from)
    }
}
