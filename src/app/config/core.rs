use std::io::ErrorKind;

use anyhow::Context;
use tokio::task::JoinHandle;

use super::{Config, data::Data, message::Message};
use crate::{ArcPath, arc_path, fs::Fs};

/// The core of the Config actor.
pub struct Core {
    fs: Fs,
    /// Location of `config.toml`
    path: ArcPath,
    data: Data,
}

impl Core {
    pub fn new(fs: Fs, path: ArcPath) -> Self {
        Self {
            fs,
            path,
            data: Data::default(),
        }
    }

    pub fn spawn(mut self) -> (Config, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                use Message::*;
                match msg {
                    Load { tx } => {
                        let _ = tx.send(self.load().await);
                    }
                    Save { tx } => {
                        let _ = tx.send(self.save().await);
                    }
                    GetPath { opt, tx } => {
                        let _ = tx.send(self.data.path(opt));
                    }
                    SetPath { opt, path } => self.data.set_path(opt, path),
                    GetLogLevel { tx } => {
                        let _ = tx.send(self.data.log_level());
                    }
                    SetLogLevel { level } => self.data.set_log_level(level),
                    GetUSize { opt, tx } => {
                        let _ = tx.send(self.data.usize(opt));
                    }
                    SetUSize { opt, value } => self.data.set_usize(opt, value),
                    GetStr { opt, tx } => {
                        let _ = tx.send(self.data.str(opt));
                    }
                    SetStr { opt, value } => self.data.set_str(opt, value),
                }
            }
        });
        (Config::Actual(tx), handle)
    }

    async fn load(&mut self) -> anyhow::Result<()> {
        let contents = match self.fs.read_to_string(self.path.clone()).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Reading config file {}", self.path.display()));
            }
        };
        self.data = toml::from_str(&contents)
            .with_context(|| format!("Parsing config file {}", self.path.display()))?;
        Ok(())
    }

    async fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            self.fs
                .mkdir(arc_path(parent))
                .await
                .with_context(|| format!("Creating config directory {}", parent.display()))?;
        }
        let contents = toml::to_string(&self.data).context("Serializing config")?;
        self.fs
            .write(self.path.clone(), contents)
            .await
            .with_context(|| format!("Writing config file {}", self.path.display()))
    }
}
