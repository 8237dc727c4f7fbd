use std::time::Duration;

use crate::{
    ArcStr,
    api::{AuthApi, OptionKind, OptionsApi, SandwichApi},
    app::{builder::BuilderForm, options::OptionsFacade},
    log::Log,
    net::Net,
    storage::Storage,
};

/// Commands the application can run, one per CLI subcommand.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Command {
    /// Interactive terminal UI
    #[default]
    Tui,
    List,
    Mine,
    Show {
        id: i64,
    },
    /// One kind, or every kind when `None`
    Options {
        kind: Option<OptionKind>,
    },
    Delete {
        id: i64,
    },
    Login {
        email: ArcStr,
        password: ArcStr,
        /// Answers the MFA challenge in the same run
        code: Option<ArcStr>,
    },
    Logout,
    Register {
        email: ArcStr,
        password: ArcStr,
    },
    ForgotPassword {
        email: ArcStr,
    },
    Exists {
        email: ArcStr,
    },
    Build(Recipe),
    Edit {
        id: i64,
        recipe: Recipe,
    },
}

/// A sandwich described with option labels, as typed on the command line.
///
/// A category given as the single label `none` sets its "no" flag. When
/// editing, categories left empty keep the current selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipe {
    pub name: Option<ArcStr>,
    pub bread: Option<ArcStr>,
    pub cheeses: Vec<ArcStr>,
    pub dressings: Vec<ArcStr>,
    pub meats: Vec<ArcStr>,
    pub toppings: Vec<ArcStr>,
    pub toasted: Option<bool>,
    pub price: Option<f64>,
}

impl Recipe {
    /// The labels given for `kind`.
    pub fn labels(&self, kind: OptionKind) -> Vec<ArcStr> {
        match kind {
            OptionKind::Breads => self.bread.iter().cloned().collect(),
            OptionKind::Cheeses => self.cheeses.clone(),
            OptionKind::Dressings => self.dressings.clone(),
            OptionKind::Meats => self.meats.clone(),
            OptionKind::Toppings => self.toppings.clone(),
        }
    }
}

/// Client side timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub options: Duration,
    pub auth: Duration,
    pub submit: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            options: Duration::from_secs(5),
            auth: Duration::from_secs(5),
            submit: Duration::from_secs(10),
        }
    }
}

/// The clients and the facade shared by the CLI commands and the UI.
#[derive(Debug, Clone)]
pub struct Services {
    pub log: Log,
    pub storage: Storage,
    pub sandwiches: SandwichApi,
    pub auth: AuthApi,
    pub options: OptionsApi,
    pub facade: OptionsFacade,
    pub submit_timeout: Duration,
}

impl Services {
    /// Wires the clients and the options facade around one networking actor.
    ///
    /// # Arguments
    /// * `net` - The networking actor
    /// * `log` - The logging actor
    /// * `storage` - Persistent storage for the token and owned ids
    /// * `base_url` - Backend root, without a trailing slash
    /// * `timeouts` - Request limits
    pub fn new(net: Net, log: Log, storage: Storage, base_url: ArcStr, timeouts: Timeouts) -> Self {
        let options = OptionsApi::new(net.clone(), base_url.clone());
        Self {
            sandwiches: SandwichApi::new(net.clone(), base_url.clone(), storage.clone()),
            auth: AuthApi::new(net, base_url, storage.clone(), timeouts.auth),
            facade: OptionsFacade::new(options.clone(), log.clone(), timeouts.options),
            options,
            log,
            storage,
            submit_timeout: timeouts.submit,
        }
    }

    /// A fresh builder wired to the shared facade.
    pub fn builder(&self) -> BuilderForm {
        BuilderForm::new(
            self.facade.clone(),
            self.sandwiches.clone(),
            self.storage.clone(),
            self.log.clone(),
            self.submit_timeout,
        )
    }
}
