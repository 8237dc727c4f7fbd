use tokio::sync::oneshot::Sender;

use super::data::Screen;

#[derive(Debug)]
pub enum Message {
    TakeOver(Sender<anyhow::Result<()>>),
    Release(Sender<anyhow::Result<()>>),
    Draw(Screen, Sender<anyhow::Result<()>>),
}
