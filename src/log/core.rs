use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;

use super::{
    Log,
    data::{LogLevel, LogMessage},
    message::Message,
};
use crate::{ArcPath, arc_path, fs::Fs};

const FILE_PREFIX: &str = "sandwich-hub_";
const LATEST: &str = "latest.log";
const DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// The core of the Log actor.
///
/// Writes go through the [`Fs`] actor, so a mocked filesystem also captures
/// the log files.
#[derive(Debug)]
pub struct Core {
    fs: Fs,
    log_dir: ArcPath,
    /// Path to the timestamped file of this run
    log_path: ArcPath,
    latest_path: ArcPath,
    /// Messages to be echoed to stderr on flush
    logs_to_print: Vec<LogMessage>,
    print_level: LogLevel,
    /// Days a log file is kept. Zero keeps everything
    max_age: usize,
}

impl Core {
    pub async fn build(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let log_path = arc_path(log_dir.join(format!(
            "{FILE_PREFIX}{}.log",
            chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S")
        )));
        let latest_path = arc_path(log_dir.join(LATEST));

        fs.mkdir(log_dir.clone())
            .await
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
        fs.write(log_path.clone(), "")
            .await
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;
        fs.write(latest_path.clone(), "").await.with_context(|| {
            format!("Failed to create latest log file: {}", latest_path.display())
        })?;

        Ok(Self {
            fs,
            log_dir,
            log_path,
            latest_path,
            logs_to_print: Vec::new(),
            print_level: level,
            max_age,
        })
    }

    pub fn spawn(mut self) -> (Log, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Message::Log(msg) => self.log(msg).await,
                    Message::Flush => {
                        rx.close();
                        self.flush();
                        break;
                    }
                    Message::CollectGarbage => self.collect_garbage().await,
                }
            }
        });
        (Log::Actual(tx), handle)
    }

    async fn log(&mut self, message: LogMessage) {
        let line = format!("{message}\n");
        // A failing log write has nowhere to be reported but stderr
        if let Err(err) = self.fs.append(self.log_path.clone(), line.clone()).await {
            eprintln!("Failed to write to {}: {err}", self.log_path.display());
        }
        if let Err(err) = self.fs.append(self.latest_path.clone(), line).await {
            eprintln!("Failed to write to {}: {err}", self.latest_path.display());
        }

        if message.level >= self.print_level {
            self.logs_to_print.push(message);
        }
    }

    fn flush(self) {
        for message in &self.logs_to_print {
            eprintln!("{message}");
        }
        if !self.logs_to_print.is_empty() {
            eprintln!("Check the full log file: {}", self.log_path.display());
        }
    }

    async fn collect_garbage(&mut self) {
        if self.max_age == 0 {
            return;
        }

        let Ok(logs) = self.fs.read_dir(self.log_dir.clone()).await else {
            self.log(LogMessage::new(
                LogLevel::Error,
                "log",
                "Failed to read the logs directory during garbage collection",
            ))
            .await;
            return;
        };

        let max_age = DAY * self.max_age as u32;
        for log in logs {
            let Some(filename) = log.file_name().map(|f| f.to_string_lossy().into_owned()) else {
                continue;
            };
            if !filename.starts_with(FILE_PREFIX) || !filename.ends_with(".log") {
                continue;
            }
            if *log == *self.log_path {
                continue;
            }
            let Ok(age) = self.fs.age(log.clone()).await else {
                continue;
            };
            if age > max_age && self.fs.remove_file(log.clone()).await.is_err() {
                self.log(LogMessage::new(
                    LogLevel::Warning,
                    "log",
                    format!("Failed to remove the log file: {}", log.display()),
                ))
                .await;
            }
        }
    }
}
