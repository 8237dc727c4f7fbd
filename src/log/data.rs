use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogMessage {
    pub level: LogLevel,
    pub scope: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogMessage {
    /// Creates a message stamped with the current time.
    pub fn new(level: LogLevel, scope: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            scope,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.level,
            self.scope,
            self.message
        )
    }
}

/// Severity of a log message.
///
/// Ordered by severity: `Info` < `Warning` < `Error`. The configured level
/// decides which messages are echoed to stderr when the logger is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Regular operational information
    Info,
    /// Something failed but the application recovered
    #[default]
    Warning,
    /// A failure the user should know about
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}
