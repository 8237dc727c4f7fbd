//! Application layer: bootstrap, the one-shot commands and the interactive UI.

pub mod builder;
pub mod config;
pub mod options;
pub mod ui;
pub mod views;

mod core;
mod data;
#[cfg(test)]
mod tests;

use crate::ArcPath;

pub use data::{Command, Recipe, Services, Timeouts};

/// The application.
///
/// [`App::build`] spawns every actor in order (env, fs, config, log, net,
/// storage) and wires the API clients. A built app either resolves a single
/// [`Command`] into printable output or runs the terminal UI.
pub struct App {
    core: core::Core,
}

impl App {
    /// Builds the app from the configuration at `config_path`, or at
    /// `$HOME/.config/sandwich-hub/config.toml` when `None`.
    pub async fn build(config_path: Option<ArcPath>) -> anyhow::Result<Self> {
        let core = core::Core::build(config_path).await?;
        Ok(Self { core })
    }

    /// Builds an app over already wired services.
    pub fn with_services(services: Services) -> Self {
        Self {
            core: core::Core::new(services),
        }
    }

    /// Runs a one-shot command and returns what it prints.
    ///
    /// [`Command::Tui`] is not one-shot; use [`App::run_tui`].
    pub async fn resolve(&self, command: Command) -> anyhow::Result<String> {
        self.core.resolve(command).await
    }

    /// Takes over the terminal until the user quits.
    pub async fn run_tui(&self) -> anyhow::Result<()> {
        self.core.run_tui().await
    }

    /// Flushes the log. Call once, right before exiting.
    pub async fn shutdown(self) {
        self.core.shutdown().await;
    }
}
