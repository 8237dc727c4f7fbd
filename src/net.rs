use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcStr, log::Log};

mod core;
mod data;
mod message;
mod mock;

pub use data::{HttpMethod, HttpRequest, HttpResponse};
use message::Message;
pub use mock::MockReply;

/// The networking actor.
///
/// Sends HTTP requests and hands back the status code and raw body of the
/// response. Any status is a successful exchange; only transport failures
/// (refused connections, DNS errors, broken bodies) are errors. Requests
/// are executed concurrently, so a slow request never blocks the others.
///
/// # Examples
/// ```ignore
/// let net = Net::spawn(log);
/// let res = net.send(HttpRequest::get("http://localhost:5251/api/options/breads")).await?;
/// assert_eq!(res.status, 200);
/// ```
#[derive(Debug, Clone)]
pub enum Net {
    /// A real networking actor backed by `reqwest`
    Actual(Sender<Message>),
    /// A scripted mock recording every request it receives
    Mock(mock::Mock),
}

impl Net {
    /// Spawns a networking actor.
    pub fn spawn(log: Log) -> Self {
        let (net, _) = core::Core::new(log).spawn();
        net
    }

    /// Creates a mock without any scripted reply.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::default())
    }

    /// Scripts the reply of a mock for `method` and `url`.
    ///
    /// Replies queued for the same request are consumed in order and the last
    /// one keeps being returned. No-op for a real actor.
    pub fn on(&self, method: HttpMethod, url: impl Into<ArcStr>, reply: MockReply) -> &Self {
        if let Self::Mock(mock) = self {
            mock.push(method, url.into(), reply);
        }
        self
    }

    /// Requests received by a mock, oldest first. Empty for a real actor.
    pub fn requests(&self) -> Vec<HttpRequest> {
        match self {
            Self::Actual(_) => Vec::new(),
            Self::Mock(mock) => mock.requests(),
        }
    }

    /// Sends a request and waits for the whole response body.
    pub async fn send(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Send { request, tx })
                    .await
                    .context("Sending message to Net actor")
                    .expect("Net actor died");
                rx.await
                    .context("Awaiting response from Net actor")
                    .expect("Net actor died")
            }
            Self::Mock(mock) => mock.send(request).await,
        }
    }

    /// Sends a GET request.
    ///
    /// # Arguments
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    /// The response, or an error if the request could not be sent.
    pub async fn get(&self, url: impl Into<ArcStr>) -> anyhow::Result<HttpResponse> {
        self.send(HttpRequest::get(url)).await
    }

    /// Sends a DELETE request.
    ///
    /// # Arguments
    /// * `url` - The URL of the resource
    ///
    /// # Returns
    /// The response, or an error if the request could not be sent.
    pub async fn delete(&self, url: impl Into<ArcStr>) -> anyhow::Result<HttpResponse> {
        self.send(HttpRequest::delete(url)).await
    }
}
