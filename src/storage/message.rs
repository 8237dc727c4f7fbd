use tokio::sync::oneshot::Sender;

use crate::ArcStr;

/// Messages that can be sent to the Storage actor.
#[derive(Debug)]
pub enum Message {
    Get {
        key: ArcStr,
        tx: Sender<Option<ArcStr>>,
    },
    Set {
        key: ArcStr,
        value: ArcStr,
        tx: Sender<anyhow::Result<()>>,
    },
    Remove {
        key: ArcStr,
        tx: Sender<anyhow::Result<()>>,
    },
    SetOwned {
        id: i64,
        owned: bool,
        tx: Sender<anyhow::Result<()>>,
    },
}
