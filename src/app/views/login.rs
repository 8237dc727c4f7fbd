use super::{FormInput, Route};
use crate::{
    ArcStr,
    api::{ApiResult, AuthApi},
    log::Log,
};

const SCOPE: &str = "app.views.login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
    MfaCode,
}

/// Email and password login, with an optional MFA step.
#[derive(Debug, Clone)]
pub struct Login {
    auth: AuthApi,
    log: Log,
    pub email: String,
    pub password: String,
    pub mfa_code: String,
    pub focus: LoginField,
    pub error: Option<ArcStr>,
    pub submitting: bool,
    pub show_register_suggestion: bool,
    pub requires_mfa: bool,
    pub mfa_token: Option<ArcStr>,
}

impl Login {
    /// Creates an empty login form.
    pub fn new(auth: AuthApi, log: Log) -> Self {
        Self {
            auth,
            log,
            email: String::new(),
            password: String::new(),
            mfa_code: String::new(),
            focus: LoginField::default(),
            error: None,
            submitting: false,
            show_register_suggestion: false,
            requires_mfa: false,
            mfa_token: None,
        }
    }

    /// Sends the credentials. Returns where to go on success.
    pub async fn submit(&mut self) -> Option<Route> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;
        self.show_register_suggestion = false;

        let res = self
            .auth
            .login(self.email.trim(), self.password.trim())
            .await;
        let route = self.handle_login(res).await;
        self.submitting = false;
        route
    }

    async fn handle_login(&mut self, res: ApiResult) -> Option<Route> {
        if !res.ok {
            self.log
                .info(SCOPE, format!("Login failed with status {}", res.status));
            self.error = Some(self.failure_message(&res).into());
            return None;
        }

        if res.requires_mfa() {
            self.requires_mfa = true;
            self.mfa_token = res.mfa_token().map(ArcStr::from);
            self.focus = LoginField::MfaCode;
            return None;
        }

        self.store_token(&res, "Login failed").await
    }

    fn failure_message(&mut self, res: &ApiResult) -> String {
        match res.status {
            401 => {
                self.show_register_suggestion = true;
                res.error()
                    .unwrap_or("That email and password didn't match. Try again or register a new account.")
                    .to_string()
            }
            429 => "Too many attempts. Please wait a minute and try again.".to_string(),
            0 => "Network error — please check your connection.".to_string(),
            500.. => "Something went wrong on our side. Please try again.".to_string(),
            _ => res.error().unwrap_or("Login failed.").to_string(),
        }
    }

    async fn store_token(&mut self, res: &ApiResult, fallback: &str) -> Option<Route> {
        let Some(token) = res.token() else {
            self.error = Some(fallback.into());
            return None;
        };
        if let Err(err) = self.auth.set_token(token).await {
            self.log.error(SCOPE, format!("Storing token failed: {err:#}"));
            self.error = Some(format!("{err}").into());
            return None;
        }
        self.log.info(SCOPE, "Logged in");
        Some(Route::Sandwiches)
    }

    /// Sends the MFA code for the pending challenge.
    pub async fn verify_mfa(&mut self) -> Option<Route> {
        let token = self.mfa_token.clone()?;
        let res = self.auth.verify_mfa(&token, self.mfa_code.trim()).await;
        if !res.ok {
            self.error = Some(res.error().unwrap_or("MFA failed").into());
            return None;
        }
        if res.token().is_none() {
            return None;
        }
        self.store_token(&res, "MFA failed").await
    }
}

impl FormInput for Login {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::MfaCode => &mut self.mfa_code,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match (self.requires_mfa, self.focus) {
            (true, _) => LoginField::MfaCode,
            (false, LoginField::Email) => LoginField::Password,
            (false, _) => LoginField::Email,
        };
    }
}
