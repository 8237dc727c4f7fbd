use anyhow::Context;
use reqwest::Client;
use tokio::task::JoinHandle;

use super::{
    Net,
    data::{HttpRequest, HttpResponse},
    message::Message,
};
use crate::log::Log;

const SCOPE: &str = "net";

/// The core of the Net actor, wrapping a pooled `reqwest` client.
#[derive(Debug)]
pub struct Core {
    log: Log,
    client: Client,
}

impl Core {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            client: Client::new(),
        }
    }

    /// Spawns the actor. Every request runs in its own task, so the mailbox
    /// only dispatches.
    pub fn spawn(self) -> (Net, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Send { request, tx } => {
                        let client = self.client.clone();
                        let log = self.log.clone();
                        tokio::spawn(async move {
                            let line = format!("{} {}", request.method, request.url);
                            let res = perform(&client, request)
                                .await
                                .with_context(|| format!("{line} failed"));
                            match &res {
                                Ok(response) => {
                                    log.info(SCOPE, format!("{line} -> {}", response.status))
                                }
                                Err(err) => log.warn(SCOPE, format!("{err:#}")),
                            }
                            let _ = tx.send(res);
                        });
                    }
                }
            }
        });
        (Net::Actual(tx), handle)
    }
}

async fn perform(client: &Client, request: HttpRequest) -> anyhow::Result<HttpResponse> {
    let mut builder = client.request(request.method.into(), &*request.url);
    for (name, value) in &request.headers {
        builder = builder.header(&**name, &**value);
    }
    if let Some(body) = request.body {
        builder = builder.body(body.to_string());
    }

    let response = builder.send().await.context("Sending HTTP request")?;
    let status = response.status().as_u16();
    let body = response.text().await.context("Reading response body")?;
    Ok(HttpResponse::new(status, body))
}
