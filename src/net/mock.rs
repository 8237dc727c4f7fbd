use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use super::data::{HttpMethod, HttpRequest, HttpResponse};
use crate::ArcStr;

/// What a mocked request answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Answers with a status and body
    Respond(HttpResponse),
    /// Fails as a transport error with the given message
    Fail(ArcStr),
    /// Answers after the given delay
    Delayed(Duration, HttpResponse),
    /// Never answers
    Stall,
}

impl MockReply {
    pub fn json(status: u16, body: impl Into<ArcStr>) -> Self {
        Self::Respond(HttpResponse::new(status, body))
    }

    /// Like [`MockReply::json`], but only answers after `after`.
    pub fn delayed(after: Duration, status: u16, body: impl Into<ArcStr>) -> Self {
        Self::Delayed(after, HttpResponse::new(status, body))
    }
}

type Key = (HttpMethod, ArcStr);

/// Mock implementation of the Net actor.
///
/// Replies are looked up by method and exact URL. Unscripted requests fail
/// like an unreachable server would.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    replies: Arc<Mutex<HashMap<Key, VecDeque<MockReply>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Mock {
    /// Queues `reply` for `method` and `url`.
    pub fn push(&self, method: HttpMethod, url: ArcStr, reply: MockReply) {
        if let Ok(mut lock) = self.replies.lock() {
            lock.entry((method, url)).or_default().push_back(reply);
        }
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|lock| lock.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self, key: &Key) -> Option<MockReply> {
        let mut lock = self.replies.lock().ok()?;
        let queue = lock.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    /// Records `request` and answers with the next scripted reply.
    ///
    /// # Returns
    /// An error like an unreachable server would give when nothing was scripted.
    pub async fn send(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        let key = (request.method, request.url.clone());
        if let Ok(mut lock) = self.requests.lock() {
            lock.push(request);
        }

        match self.next_reply(&key) {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(anyhow::anyhow!("{message}")),
            Some(MockReply::Delayed(after, response)) => {
                tokio::time::sleep(after).await;
                Ok(response)
            }
            Some(MockReply::Stall) => std::future::pending().await,
            None => Err(anyhow::anyhow!(
                "{} request not found in mock replies: {}",
                key.0,
                key.1
            )),
        }
    }
}
