use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio::{
    sync::{mpsc::Sender, oneshot},
    task::JoinHandle,
};

use crate::{
    app::{Services, views::Route},
    terminal::{Terminal, UiEvent},
};

mod core;
mod data;
mod message;
mod screens;
#[cfg(test)]
mod tests;

pub use data::MockData;
use message::Message;

/// The UI actor.
///
/// Hosts every view, routes key presses to the current one and draws the
/// result on the [`Terminal`]. Option lists, toasts and delayed redirects
/// advance on a periodic tick, so the screen keeps moving while a save is
/// in flight.
#[derive(Debug, Clone)]
pub enum Ui {
    Actual(Sender<Message>),
    /// Records the events it receives
    Mock(Arc<Mutex<MockData>>),
}

impl Ui {
    /// Spawns the actor showing the sandwich list.
    pub fn spawn(services: Services, terminal: Terminal) -> (Self, JoinHandle<()>) {
        core::Core::new(services, terminal).spawn()
    }

    /// Creates a mock that records key presses and routes.
    pub fn mock() -> Self {
        Self::Mock(Default::default())
    }

    async fn ask<T>(sender: &Sender<Message>, msg: impl FnOnce(oneshot::Sender<T>) -> Message) -> T {
        let (tx, rx) = oneshot::channel();
        sender
            .send(msg(tx))
            .await
            .context("Sending message to Ui actor")
            .expect("Ui actor died");
        rx.await
            .context("Awaiting response from Ui actor")
            .expect("Ui actor died")
    }

    /// Handles a key press. Returns `false` once the user asked to quit.
    pub async fn handle(&self, event: UiEvent) -> bool {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Event { event, tx }).await,
            Self::Mock(data) => {
                let Ok(mut data) = data.lock() else {
                    return false;
                };
                data.events.push(event);
                event != UiEvent::Quit
            }
        }
    }

    /// Opens `route`, loading whatever it shows.
    pub async fn navigate(&self, route: Route) {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::Navigate { route, tx }).await,
            Self::Mock(data) => {
                if let Ok(mut data) = data.lock() {
                    data.route = route;
                }
            }
        }
    }

    /// The route being shown.
    pub async fn route(&self) -> Route {
        match self {
            Self::Actual(sender) => Self::ask(sender, |tx| Message::GetRoute { tx }).await,
            Self::Mock(data) => data.lock().map(|data| data.route).unwrap_or_default(),
        }
    }
}
