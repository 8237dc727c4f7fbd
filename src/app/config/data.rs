use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ArcPath, ArcStr, arc_path, log::LogLevel};

/// Path-valued configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOpt {
    /// Directory where log files are stored
    LogDir,
    /// File backing the persistent key/value storage
    StoragePath,
}

/// Numeric configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum USizeOpt {
    /// Days a log file is kept before garbage collection. Zero keeps all
    MaxAge,
    /// Seconds to wait for an option list to load
    OptionsTimeout,
    /// Seconds to wait for an authentication request
    AuthTimeout,
    /// Seconds to wait for a sandwich to be saved
    SubmitTimeout,
}

/// String-valued configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrOpt {
    /// Base URL of the Sandwich Shop backend, without a trailing slash
    ApiBaseUrl,
}

/// Everything that can be set in `config.toml`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    api_base_url: String,
    log_dir: PathBuf,
    storage_path: PathBuf,
    log_level: LogLevel,
    max_age: usize,
    options_timeout: usize,
    auth_timeout: usize,
    submit_timeout: usize,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5251".to_string(),
            log_dir: PathBuf::from("/tmp/sandwich-hub/logs"),
            storage_path: PathBuf::from("/tmp/sandwich-hub/storage.toml"),
            log_level: LogLevel::Warning,
            max_age: 30,
            options_timeout: 5,
            auth_timeout: 5,
            submit_timeout: 10,
        }
    }
}

impl Data {
    /// Reads a path option.
    pub fn path(&self, opt: PathOpt) -> ArcPath {
        match opt {
            PathOpt::LogDir => arc_path(&self.log_dir),
            PathOpt::StoragePath => arc_path(&self.storage_path),
        }
    }

    pub fn set_path(&mut self, opt: PathOpt, path: ArcPath) {
        match opt {
            PathOpt::LogDir => self.log_dir = path.to_path_buf(),
            PathOpt::StoragePath => self.storage_path = path.to_path_buf(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    /// Reads a numeric option.
    pub fn usize(&self, opt: USizeOpt) -> usize {
        match opt {
            USizeOpt::MaxAge => self.max_age,
            USizeOpt::OptionsTimeout => self.options_timeout,
            USizeOpt::AuthTimeout => self.auth_timeout,
            USizeOpt::SubmitTimeout => self.submit_timeout,
        }
    }

    pub fn set_usize(&mut self, opt: USizeOpt, value: usize) {
        match opt {
            USizeOpt::MaxAge => self.max_age = value,
            USizeOpt::OptionsTimeout => self.options_timeout = value,
            USizeOpt::AuthTimeout => self.auth_timeout = value,
            USizeOpt::SubmitTimeout => self.submit_timeout = value,
        }
    }

    /// Reads a string option.
    pub fn str(&self, opt: StrOpt) -> ArcStr {
        match opt {
            StrOpt::ApiBaseUrl => ArcStr::from(self.api_base_url.as_str()),
        }
    }

    /// Sets a string option. The base URL loses its trailing slashes.
    pub fn set_str(&mut self, opt: StrOpt, value: ArcStr) {
        match opt {
            StrOpt::ApiBaseUrl => self.api_base_url = value.trim().trim_end_matches('/').to_string(),
        }
    }
}
