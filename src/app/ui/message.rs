use tokio::sync::oneshot::Sender;

use crate::{app::views::Route, terminal::UiEvent};

#[derive(Debug)]
pub enum Message {
    Event { event: UiEvent, tx: Sender<bool> },
    Navigate { route: Route, tx: Sender<()> },
    GetRoute { tx: Sender<Route> },
}
