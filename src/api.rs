//! Typed clients for the Sandwich Shop REST backend.
//!
//! Each client is a thin, cheaply clonable wrapper around the [`Net`] actor
//! that knows the endpoints of one resource. Clients never retry and only
//! the auth client applies its own timeout; callers that need a deadline
//! wrap calls in [`deadline`].
//!
//! [`Net`]: crate::net::Net

use std::{future::Future, time::Duration};

mod auth;
mod data;
mod error;
mod options;
mod sandwich;
#[cfg(test)]
mod tests;

pub use auth::AuthApi;
pub use data::{ApiResult, OptionKind, Sandwich, SandwichOption, SandwichPayload};
pub use error::ApiError;
pub use options::OptionsApi;
pub use sandwich::SandwichApi;

/// Runs `fut`, giving up with [`ApiError::Timeout`] after `limit`.
///
/// Dropping the future on timeout cancels the in-flight request.
pub async fn deadline<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or_else(|_| Err(ApiError::Timeout(limit)))
}

/// Joins the backend base URL with an absolute endpoint path.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
