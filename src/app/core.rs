use std::path::Path;

use anyhow::{Context, bail};
use tokio::sync::mpsc;

use super::{
    Command, Recipe, Services, Timeouts,
    builder::{BuilderForm, SubmitOutcome},
    config::{Config, PathOpt, StrOpt, USizeOpt},
    ui::Ui,
    views::{ForgotPassword, Login, Register},
};
use crate::{
    ArcPath, ArcStr,
    api::{OptionKind, Sandwich},
    arc_path,
    env::{API_URL_VAR, Env},
    fs::Fs,
    log::Log,
    net::Net,
    storage::Storage,
    terminal::Terminal,
};

const SCOPE: &str = "app";

pub struct Core {
    services: Services,
}

impl Core {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Bootstraps every actor from the configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Configuration file to use instead of the default one
    ///
    /// # Returns
    /// The ready application, or an error if the configuration or the storage
    /// file could not be read.
    pub async fn build(config_path: Option<ArcPath>) -> anyhow::Result<Self> {
        let env = Env::spawn();
        let fs = Fs::spawn();

        let config_path = match config_path {
            Some(path) => path,
            None => {
                let home = env.env("HOME").await.context("Reading $HOME")?;
                arc_path(
                    Path::new(&*home)
                        .join(".config")
                        .join("sandwich-hub")
                        .join("config.toml"),
                )
            }
        };

        let missing = fs.read_to_string(config_path.clone()).await.is_err();
        let config = Config::spawn(fs.clone(), config_path);
        config.load().await?;
        if missing {
            config.save().await?;
        }
        if let Some(url) = env.env_opt(API_URL_VAR).await {
            config.set_str(StrOpt::ApiBaseUrl, url).await;
        }

        let log = Log::spawn(
            fs.clone(),
            config.log_level().await,
            config.usize(USizeOpt::MaxAge).await,
            config.path(PathOpt::LogDir).await,
        )
        .await?;
        log.collect_garbage().await;

        let net = Net::spawn(log.clone());
        let storage = Storage::spawn(fs, config.path(PathOpt::StoragePath).await).await?;
        let base_url = config.str(StrOpt::ApiBaseUrl).await;
        log.info(SCOPE, format!("Starting sandwich-hub against {base_url}"));

        let services = Services::new(net, log, storage, base_url, timeouts(&config).await);
        Ok(Self::new(services))
    }

    /// Flushes the log.
    pub async fn shutdown(self) {
        let _ = self.services.log.flush().await;
    }

    /// Runs the interactive interface until the user quits. The terminal is
    /// given back even when the interface fails.
    pub async fn run_tui(&self) -> anyhow::Result<()> {
        let log = &self.services.log;
        let (events_tx, mut events_rx) = mpsc::channel(crate::BUFFER_SIZE);
        let terminal = Terminal::spawn(log.clone(), events_tx)?;
        terminal.take_over().await?;

        let (ui, handle) = Ui::spawn(self.services.clone(), terminal.clone());
        while let Some(event) = events_rx.recv().await {
            if !ui.handle(event).await {
                break;
            }
        }
        drop(ui);
        let _ = log.warn_on_error(SCOPE, handle.await);

        terminal.release().await
    }

    /// Runs a one-shot command.
    ///
    /// # Arguments
    /// * `command` - The command to run
    ///
    /// # Returns
    /// The text to print, or the error to report.
    pub async fn resolve(&self, command: Command) -> anyhow::Result<String> {
        let s = &self.services;
        s.log.info(SCOPE, format!("Running {command:?}"));
        match command {
            Command::Tui => bail!("The terminal UI is not a one-shot command"),
            Command::List => {
                let sandwiches = s.sandwiches.list().await?;
                let owned = s.storage.owned_sandwiches().await;
                Ok(list_lines(&sandwiches, |id| owned.contains(&id)))
            }
            Command::Mine => {
                if s.auth.token().await.is_none() {
                    bail!("Not logged in. Run `sandwich-hub login` first.");
                }
                let sandwiches = s.sandwiches.mine().await?;
                Ok(list_lines(&sandwiches, |_| true))
            }
            Command::Show { id } => {
                let sandwich = s.sandwiches.get(id).await?;
                Ok(details(&sandwich))
            }
            Command::Options { kind } => self.options(kind).await,
            Command::Delete { id } => {
                s.sandwiches.delete(id).await?;
                let _ = s.log.warn_on_error(SCOPE, s.storage.forget_sandwich(id).await);
                Ok(format!("Deleted sandwich #{id}"))
            }
            Command::Login {
                email,
                password,
                code,
            } => self.login(&email, &password, code).await,
            Command::Logout => {
                s.auth.logout().await?;
                Ok("Logged out".to_string())
            }
            Command::Register { email, password } => {
                let mut form = Register::new(s.auth.clone(), s.log.clone());
                form.email = email.to_string();
                form.password = password.to_string();
                form.confirm = password.to_string();
                if form.submit().await.is_none() {
                    bail!("{}", form.error.as_deref().unwrap_or("Registration failed"));
                }
                Ok(form.success.as_deref().unwrap_or_default().to_string())
            }
            Command::ForgotPassword { email } => {
                let mut form = ForgotPassword::new(s.auth.clone(), s.log.clone());
                form.email = email.to_string();
                form.submit(std::time::Instant::now()).await;
                match (&form.success, &form.error) {
                    (Some(success), _) => Ok(success.to_string()),
                    (None, error) => bail!("{}", error.as_deref().unwrap_or("Request failed")),
                }
            }
            Command::Exists { email } => {
                let verb = if s.auth.exists(&email).await {
                    "is"
                } else {
                    "is not"
                };
                Ok(format!("{email} {verb} registered"))
            }
            Command::Build(recipe) => {
                let mut form = s.builder();
                form.init();
                form.wait_loaded().await;
                apply_recipe(&mut form, &recipe)?;
                let outcome = form.submit().await;
                report(&form, outcome)
            }
            Command::Edit { id, recipe } => {
                let mut form = s.builder();
                form.init();
                form.load_for_edit(id).await?;
                form.wait_loaded().await;
                apply_recipe(&mut form, &recipe)?;
                let outcome = form.submit().await;
                report(&form, outcome)
            }
        }
    }

    async fn options(&self, kind: Option<OptionKind>) -> anyhow::Result<String> {
        let facade = &self.services.facade;
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => OptionKind::ALL.to_vec(),
        };
        let handles: Vec<_> = kinds.iter().map(|kind| facade.load(*kind)).collect();
        for handle in handles {
            handle.await.context("Loading options")?;
        }

        let mut out = Vec::new();
        for kind in kinds {
            let (list, error) = facade.snapshot(kind);
            if let Some(error) = error {
                bail!("{error}");
            }
            out.push(format!("{}:", kind.title()));
            out.extend(list.iter().map(|o| format!("  {:>3}  {}", o.id, o.label)));
        }
        Ok(out.join("\n"))
    }

    async fn login(&self, email: &str, password: &str, code: Option<ArcStr>) -> anyhow::Result<String> {
        let s = &self.services;
        let mut form = Login::new(s.auth.clone(), s.log.clone());
        form.email = email.to_string();
        form.password = password.to_string();

        let mut route = form.submit().await;
        if route.is_none() && form.requires_mfa {
            let Some(code) = code else {
                bail!("Multi-factor authentication required. Run again with --code.");
            };
            form.mfa_code = code.to_string();
            route = form.verify_mfa().await;
        }
        if route.is_none() {
            bail!("{}", form.error.as_deref().unwrap_or("Login failed"));
        }
        Ok("Logged in".to_string())
    }
}

async fn timeouts(config: &Config) -> Timeouts {
    let secs = |n: usize| std::time::Duration::from_secs(n as u64);
    Timeouts {
        options: secs(config.usize(USizeOpt::OptionsTimeout).await),
        auth: secs(config.usize(USizeOpt::AuthTimeout).await),
        submit: secs(config.usize(USizeOpt::SubmitTimeout).await),
    }
}

fn summary_line(sandwich: &Sandwich, owned: bool) -> String {
    let mut line = format!("#{} {}", sandwich.id, sandwich.name);
    if let Some(price) = sandwich.price {
        line.push_str(&format!("  ${price:.2}"));
    }
    if sandwich.toasted == Some(true) {
        line.push_str("  toasted");
    }
    if owned {
        line.push_str("  (yours)");
    }
    line
}

fn list_lines(sandwiches: &[Sandwich], owned: impl Fn(i64) -> bool) -> String {
    if sandwiches.is_empty() {
        return "No sandwiches".to_string();
    }
    let mut lines = Vec::new();
    for sandwich in sandwiches {
        lines.push(summary_line(sandwich, owned(sandwich.id)));
        if !sandwich.description().is_empty() {
            lines.push(format!("    {}", sandwich.description()));
        }
    }
    lines.join("\n")
}

fn details(sandwich: &Sandwich) -> String {
    let mut lines = vec![format!("#{} {}", sandwich.id, sandwich.name)];
    if let Some(price) = sandwich.price {
        lines.push(format!("Price: ${price:.2}"));
    }
    if let Some(toasted) = sandwich.toasted {
        lines.push(format!("Toasted: {}", if toasted { "yes" } else { "no" }));
    }
    if !sandwich.description().is_empty() {
        lines.push(format!("Description: {}", sandwich.description()));
    }
    lines.join("\n")
}

/// Sets the selection from option labels. Categories without labels keep
/// what the form already holds.
fn apply_recipe(form: &mut BuilderForm, recipe: &Recipe) -> anyhow::Result<()> {
    for kind in OptionKind::ALL {
        let labels = recipe.labels(kind);
        if labels.is_empty() {
            continue;
        }
        if let Some(error) = form.state.list_errors.get(&kind) {
            bail!("{error}");
        }

        for id in form.state.selected.ids(kind).to_vec() {
            form.toggle(kind, id, false);
        }
        let none = labels.len() == 1 && labels[0].trim().eq_ignore_ascii_case("none");
        if none && kind != OptionKind::Breads {
            form.toggle_none(kind, true);
            continue;
        }
        form.toggle_none(kind, false);

        for label in labels {
            let id = form
                .state
                .list(kind)
                .iter()
                .find(|option| option.label.eq_ignore_ascii_case(label.trim()))
                .map(|option| option.id)
                .with_context(|| {
                    format!("Unknown {} option: {label}", kind.title().to_lowercase())
                })?;
            form.toggle(kind, id, true);
        }
    }

    if let Some(name) = &recipe.name {
        form.set_name(name.to_string());
    }
    if let Some(toasted) = recipe.toasted {
        form.set_toasted(toasted);
    }
    if let Some(price) = recipe.price {
        form.set_price_text(price.to_string());
    }
    Ok(())
}

fn report(form: &BuilderForm, outcome: SubmitOutcome) -> anyhow::Result<String> {
    let state = &form.state;
    match outcome {
        SubmitOutcome::Saved { id: Some(id), .. } => Ok(format!("Sandwich saved! (#{id})")),
        SubmitOutcome::Saved { id: None, .. } => Ok("Sandwich saved!".to_string()),
        SubmitOutcome::Invalid => {
            let mut lines = vec!["Save rejected:".to_string()];
            lines.extend(
                state
                    .field_errors
                    .iter()
                    .map(|(kind, error)| format!("  {}: {error}", kind.title())),
            );
            if let Some(error) = &state.name_error {
                lines.push(format!("  Name: {error}"));
            }
            bail!("{}", lines.join("\n"))
        }
        SubmitOutcome::Failed | SubmitOutcome::Ignored => {
            bail!("{}", state.error.as_deref().unwrap_or("Nothing was saved"))
        }
    }
}
