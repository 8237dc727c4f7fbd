use std::{io, time::Duration};

use tokio::sync::oneshot::Sender;

use crate::ArcPath;

/// Messages that can be sent to the Fs actor.
#[derive(Debug)]
pub enum Message {
    ReadToString {
        path: ArcPath,
        tx: Sender<io::Result<String>>,
    },
    Write {
        path: ArcPath,
        contents: String,
        tx: Sender<io::Result<()>>,
    },
    Append {
        path: ArcPath,
        contents: String,
        tx: Sender<io::Result<()>>,
    },
    MkDir {
        path: ArcPath,
        tx: Sender<io::Result<()>>,
    },
    RemoveFile {
        path: ArcPath,
        tx: Sender<io::Result<()>>,
    },
    ReadDir {
        path: ArcPath,
        tx: Sender<io::Result<Vec<ArcPath>>>,
    },
    Age {
        path: ArcPath,
        tx: Sender<io::Result<Duration>>,
    },
}
