use crate::{
    ArcStr,
    api::{AuthApi, Sandwich, SandwichApi},
    log::Log,
};

const SCOPE: &str = "app.views.dashboard";

/// The sandwiches of the logged in user.
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: SandwichApi,
    auth: AuthApi,
    log: Log,
    pub token: Option<ArcStr>,
    pub sandwiches: Vec<Sandwich>,
    pub loading: bool,
}

impl Dashboard {
    /// Creates an empty dashboard. Nothing is loaded until [`Dashboard::refresh`].
    pub fn new(api: SandwichApi, auth: AuthApi, log: Log) -> Self {
        Self {
            api,
            auth,
            log,
            token: None,
            sandwiches: Vec::new(),
            loading: false,
        }
    }

    /// Whether a token was found on the last refresh.
    pub fn logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Rereads the token and loads the list when there is one.
    pub async fn refresh(&mut self) {
        self.token = self.auth.token().await;
        if self.logged_in() {
            self.load().await;
        } else {
            self.sandwiches.clear();
        }
    }

    /// Loads `/api/sandwiches/mine`. Any failure reads as an empty list.
    pub async fn load(&mut self) {
        self.loading = true;
        self.sandwiches = match self.api.mine().await {
            Ok(sandwiches) => sandwiches,
            Err(err) => {
                self.log.info(SCOPE, format!("Loading own sandwiches failed: {err}"));
                Vec::new()
            }
        };
        self.loading = false;
    }
}
