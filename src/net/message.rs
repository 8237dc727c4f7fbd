use tokio::sync::oneshot::Sender;

use super::data::{HttpRequest, HttpResponse};

/// Messages that can be sent to the Net actor.
#[derive(Debug)]
pub enum Message {
    Send {
        request: HttpRequest,
        tx: Sender<anyhow::Result<HttpResponse>>,
    },
}
