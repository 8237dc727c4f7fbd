use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio::sync::{mpsc, oneshot};

use crate::log::Log;

mod core;
mod data;
mod draw;
mod message;

pub use data::{Banner, Item, Screen, Section, Tone, UiEvent};
pub use draw::draw;
use message::Message;

/// The terminal actor.
///
/// Owns the `ratatui` terminal: takes over the screen, draws [`Screen`]s and
/// forwards key presses as [`UiEvent`]s to the channel given on spawn.
/// Drawing is the only way the rest of the crate touches the terminal.
#[derive(Debug, Clone)]
pub enum Terminal {
    Actual(mpsc::Sender<Message>),
    /// Records every drawn screen
    Mock(Arc<Mutex<Vec<Screen>>>),
}

impl Terminal {
    /// Spawns the actor. Key presses are sent to `events` while the terminal
    /// is taken over.
    pub fn spawn(log: Log, events: mpsc::Sender<UiEvent>) -> anyhow::Result<Self> {
        let core = core::Core::build(log, events).context("Building the Terminal actor")?;
        Ok(core.spawn().0)
    }

    /// Creates a mock that records every drawn screen.
    pub fn mock() -> Self {
        Self::Mock(Default::default())
    }

    async fn ask(
        &self,
        msg: impl FnOnce(oneshot::Sender<anyhow::Result<()>>) -> Message,
    ) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(msg(tx))
                    .await
                    .context("Sending message to Terminal actor")
                    .expect("Terminal actor died");
                rx.await
                    .context("Awaiting response from Terminal actor")
                    .expect("Terminal actor died")
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Switches to the alternate screen in raw mode and starts reading keys.
    pub async fn take_over(&self) -> anyhow::Result<()> {
        self.ask(Message::TakeOver).await
    }

    /// Gives the terminal back and stops reading keys.
    pub async fn release(&self) -> anyhow::Result<()> {
        self.ask(Message::Release).await
    }

    /// Draws `screen` over the whole terminal.
    ///
    /// # Returns
    /// An error if the terminal is not taken over or could not be written.
    pub async fn draw(&self, screen: Screen) -> anyhow::Result<()> {
        if let Self::Mock(screens) = self {
            if let Ok(mut lock) = screens.lock() {
                lock.push(screen);
            }
            return Ok(());
        }
        self.ask(|tx| Message::Draw(screen, tx)).await
    }

    /// The screens drawn so far. Always `None` on an actual terminal.
    pub fn screens(&self) -> Option<Vec<Screen>> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(screens) => screens.lock().ok().map(|lock| lock.clone()),
        }
    }

    /// The last screen drawn. Always `None` on an actual terminal.
    pub fn last_screen(&self) -> Option<Screen> {
        self.screens().and_then(|mut screens| screens.pop())
    }
}
