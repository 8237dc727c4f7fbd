use tokio::sync::oneshot::Sender;

use super::data::{PathOpt, StrOpt, USizeOpt};
use crate::{ArcPath, ArcStr, log::LogLevel};

/// Messages that can be sent to the Config actor.
#[derive(Debug)]
pub enum Message {
    Load {
        tx: Sender<anyhow::Result<()>>,
    },
    Save {
        tx: Sender<anyhow::Result<()>>,
    },
    GetPath {
        opt: PathOpt,
        tx: Sender<ArcPath>,
    },
    SetPath {
        opt: PathOpt,
        path: ArcPath,
    },
    GetLogLevel {
        tx: Sender<LogLevel>,
    },
    SetLogLevel {
        level: LogLevel,
    },
    GetUSize {
        opt: USizeOpt,
        tx: Sender<usize>,
    },
    SetUSize {
        opt: USizeOpt,
        value: usize,
    },
    GetStr {
        opt: StrOpt,
        tx: Sender<ArcStr>,
    },
    SetStr {
        opt: StrOpt,
        value: ArcStr,
    },
}
