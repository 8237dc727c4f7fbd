use std::time::Duration;

use serde_json::json;

use super::{ApiResult, endpoint};
use crate::{
    ArcStr,
    net::{HttpRequest, Net},
    storage::{Storage, TOKEN_KEY},
};

const CONNECTION_ERROR: &str = "Unable to connect to the server. Please try again.";

/// Client for the authentication endpoints.
///
/// Every call is bounded by the configured timeout and resolves to an
/// [`ApiResult`] instead of an error, so forms can branch on the status.
#[derive(Debug, Clone)]
pub struct AuthApi {
    net: Net,
    base_url: ArcStr,
    storage: Storage,
    timeout: Duration,
}

/// Why a request produced no response.
enum Failure {
    Transport(String),
    TimedOut,
}

impl AuthApi {
    /// Creates the auth client.
    ///
    /// # Arguments
    /// * `net` - The networking actor
    /// * `base_url` - Backend root, without a trailing slash
    /// * `storage` - Where the bearer token is kept
    /// * `timeout` - Limit for each auth request
    pub fn new(net: Net, base_url: ArcStr, storage: Storage, timeout: Duration) -> Self {
        Self {
            net,
            base_url,
            storage,
            timeout,
        }
    }

    async fn exchange(&self, request: HttpRequest) -> Result<ApiResult, Failure> {
        match tokio::time::timeout(self.timeout, self.net.send(request)).await {
            Ok(Ok(response)) => Ok(ApiResult::from_response(&response)),
            Ok(Err(err)) => Err(Failure::Transport(format!("{err:#}"))),
            Err(_) => Err(Failure::TimedOut),
        }
    }

    /// Posts `body` as JSON, mapping a missing response to status `0`.
    async fn post(&self, path: &str, body: serde_json::Value) -> ApiResult {
        let request = HttpRequest::post(endpoint(&self.base_url, path)).json(body.to_string());
        match self.exchange(request).await {
            Ok(result) => result,
            Err(failure) => status_zero(failure),
        }
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> ApiResult {
        self.post(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// `POST /api/auth/register`.
    ///
    /// Rejects an empty email or a password shorter than eight characters
    /// without a request. The email is trimmed and lowercased.
    pub async fn register(&self, email: &str, password: &str) -> ApiResult {
        if email.trim().is_empty() {
            return ApiResult::failure(400, "Email is required", "Email is required");
        }
        if password.chars().count() < 8 {
            return ApiResult::failure(
                400,
                "Password must be at least 8 characters",
                "Password must be at least 8 characters",
            );
        }

        let email = email.trim().to_lowercase();
        let request = HttpRequest::post(endpoint(&self.base_url, "/api/auth/register"))
            .json(json!({ "email": email, "password": password }).to_string());
        let result = match self.exchange(request).await {
            Ok(result) => result,
            Err(Failure::Transport(_)) => {
                return ApiResult::failure(503, CONNECTION_ERROR, "Connection error");
            }
            Err(failure) => return status_zero(failure),
        };

        if !result.ok
            && matches!(result.status, 400 | 409)
            && result.error() == Some("email already registered")
        {
            return ApiResult {
                body: Some(json!({ "error": "This email is already registered" })),
                ..result
            };
        }
        result
    }

    /// `POST /api/auth/mfa/verify`
    pub async fn verify_mfa(&self, mfa_token: &str, code: &str) -> ApiResult {
        self.post(
            "/api/auth/mfa/verify",
            json!({ "mfaToken": mfa_token, "code": code }),
        )
        .await
    }

    /// `POST /api/auth/forgot-password`
    pub async fn request_password_reset(&self, email: &str) -> ApiResult {
        self.post("/api/auth/forgot-password", json!({ "email": email }))
            .await
    }

    /// `GET /api/auth/exists?email=...`. Any failure reads as `false`.
    pub async fn exists(&self, email: &str) -> bool {
        let base = endpoint(&self.base_url, "/api/auth/exists");
        let Ok(url) = reqwest::Url::parse_with_params(&base, &[("email", email)]) else {
            return false;
        };
        let request = HttpRequest::new(crate::net::HttpMethod::Get, url.as_str())
            .header("Accept", "application/json");
        match self.exchange(request).await {
            Ok(result) if result.ok => result.flag("exists"),
            _ => false,
        }
    }

    /// Stores the bearer token sent with authorized requests.
    pub async fn set_token(&self, token: &str) -> anyhow::Result<()> {
        self.storage.set(TOKEN_KEY, token).await
    }

    /// The stored bearer token.
    ///
    /// # Returns
    /// `None` when nobody is logged in.
    pub async fn token(&self) -> Option<ArcStr> {
        self.storage.get(TOKEN_KEY).await
    }

    /// Forgets the bearer token. Nothing is sent to the backend.
    pub async fn logout(&self) -> anyhow::Result<()> {
        self.storage.remove(TOKEN_KEY).await
    }
}

fn status_zero(failure: Failure) -> ApiResult {
    let message = match failure {
        Failure::Transport(message) => message,
        Failure::TimedOut => "Request timed out".to_string(),
    };
    ApiResult::failure(0, message.clone(), message)
}
