use std::{fmt::Display, time::Duration};

use super::{FormInput, Redirect, Route};
use crate::{ArcStr, api::AuthApi, log::Log};

const SCOPE: &str = "app.views.register";

pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    #[default]
    Email,
    Password,
    Confirm,
}

/// Guidance label for a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Strength::Weak => "weak",
            Strength::Fair => "fair",
            Strength::Good => "good",
            Strength::Strong => "strong",
        };
        write!(f, "{label}")
    }
}

/// Account creation.
#[derive(Debug, Clone)]
pub struct Register {
    auth: AuthApi,
    log: Log,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub focus: RegisterField,
    pub submitting: bool,
    pub error: Option<ArcStr>,
    pub success: Option<ArcStr>,
}

impl Register {
    /// Creates an empty registration form.
    pub fn new(auth: AuthApi, log: Log) -> Self {
        Self {
            auth,
            log,
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            focus: RegisterField::default(),
            submitting: false,
            error: None,
            success: None,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        let password = self.password.trim();
        if self.email.trim().is_empty() {
            return Err("Email is required");
        }
        if password.is_empty() {
            return Err("Password is required");
        }
        if password.chars().count() < 8 {
            return Err("Password must be at least 8 characters");
        }
        if password != self.confirm.trim() {
            return Err("Passwords do not match");
        }
        Ok(())
    }

    /// Validates and registers. On success returns the delayed redirect to
    /// the login screen.
    pub async fn submit(&mut self) -> Option<Redirect> {
        if self.submitting {
            return None;
        }
        self.error = None;
        self.success = None;
        if let Err(message) = self.validate() {
            self.error = Some(message.into());
            return None;
        }

        self.submitting = true;
        let res = self
            .auth
            .register(self.email.trim(), self.password.trim())
            .await;
        self.submitting = false;

        if !res.ok {
            self.log
                .info(SCOPE, format!("Registration failed with status {}", res.status));
            let message = match res.status {
                400 => res.error().unwrap_or("Invalid registration details"),
                503 => "Server is currently unavailable. Please try again later.",
                _ => res.error().unwrap_or("Registration failed. Please try again."),
            };
            self.error = Some(message.into());
            return None;
        }

        self.success = Some("Registration successful! Redirecting to login...".into());
        Some(Redirect {
            to: Route::Login,
            after: REGISTER_REDIRECT_DELAY,
        })
    }

    /// One point each for length, an uppercase letter, a digit and a symbol.
    pub fn password_strength(&self) -> Strength {
        let s = &self.password;
        let score = [
            s.chars().count() >= 8,
            s.chars().any(|c| c.is_ascii_uppercase()),
            s.chars().any(|c| c.is_ascii_digit()),
            s.chars().any(|c| !c.is_ascii_alphanumeric()),
        ]
        .into_iter()
        .filter(|point| *point)
        .count();

        match score {
            0 | 1 => Strength::Weak,
            2 => Strength::Fair,
            3 => Strength::Good,
            _ => Strength::Strong,
        }
    }
}

impl FormInput for Register {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
            RegisterField::Confirm => &mut self.confirm,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Confirm,
            RegisterField::Confirm => RegisterField::Email,
        };
    }
}
