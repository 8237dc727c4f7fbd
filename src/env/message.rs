use std::env::VarError;

use tokio::sync::oneshot::Sender;

use crate::ArcStr;

/// Messages that can be sent to the Env actor.
#[derive(Debug)]
pub enum Message {
    /// Reads an environment variable
    GetEnv {
        key: ArcStr,
        tx: Sender<Result<ArcStr, VarError>>,
    },
}
