use std::time::{Duration, Instant};

use super::{FormInput, Toast, ToastKind};
use crate::{ArcStr, api::AuthApi, log::Log};

const SCOPE: &str = "app.views.forgot";

/// Time the confirmation stays up before the form resets.
pub const RESET_DELAY: Duration = Duration::from_secs(3);

/// Password reset request.
#[derive(Debug, Clone)]
pub struct ForgotPassword {
    auth: AuthApi,
    log: Log,
    pub email: String,
    pub submitting: bool,
    pub error: Option<ArcStr>,
    pub success: Option<ArcStr>,
    pub toast: Toast,
    reset_at: Option<Instant>,
}

impl ForgotPassword {
    pub fn new(auth: AuthApi, log: Log) -> Self {
        Self {
            auth,
            log,
            email: String::new(),
            submitting: false,
            error: None,
            success: None,
            toast: Toast::default(),
            reset_at: None,
        }
    }

    /// Requests a reset link for the typed email.
    ///
    /// # Arguments
    /// * `now` - Start of the delay before the form resets
    pub async fn submit(&mut self, now: Instant) {
        if self.submitting {
            return;
        }
        self.error = None;
        self.success = None;

        let email = self.email.trim().to_string();
        if email.is_empty() {
            self.error = Some("Email is required".into());
            return;
        }

        self.submitting = true;
        let res = self.auth.request_password_reset(&email).await;
        self.submitting = false;

        if !res.ok {
            self.log
                .info(SCOPE, format!("Reset request failed with status {}", res.status));
            let message = match res.status {
                404 => "Password reset is not available right now.",
                _ => res
                    .error()
                    .unwrap_or("Unable to send password reset instructions. Please try again later."),
            };
            self.error = Some(message.into());
            return;
        }

        self.success =
            Some("If an account exists for that email, reset instructions have been sent.".into());
        self.toast.show(
            "Reset instructions were requested. Check your email.",
            ToastKind::Success,
            now,
        );
        self.reset_at = Some(now + RESET_DELAY);
    }

    /// Hides the toast and clears the form once the confirmation expired.
    pub fn tick(&mut self, now: Instant) {
        self.toast.tick(now);
        if self.reset_at.is_some_and(|at| now >= at) {
            self.reset_at = None;
            self.toast.clear();
            self.email.clear();
            self.error = None;
            self.success = None;
        }
    }
}

impl FormInput for ForgotPassword {
    fn focused_mut(&mut self) -> &mut String {
        &mut self.email
    }

    fn focus_next(&mut self) {}
}
