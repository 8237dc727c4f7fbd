use std::{collections::BTreeMap, time::Duration};

use serde_json::Value;

use crate::{ArcStr, net::HttpResponse};

/// Failure classes of a call to the backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(ArcStr),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Validation failed: {}", join_fields(.0))]
    Validation(BTreeMap<String, String>),

    #[error("Unauthorized ({status})")]
    Unauthorized { status: u16, message: Option<ArcStr> },

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {}", .0.as_deref().unwrap_or("resource already exists"))]
    Conflict(Option<ArcStr>),

    #[error("Service unavailable")]
    Unavailable,

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: ArcStr },

    #[error("{status} {body}")]
    Status { status: u16, body: ArcStr },

    #[error("Invalid response: {0}")]
    Decode(ArcStr),
}

fn join_fields(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// HTTP status behind the error, `0` when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::Decode(_) => 0,
            ApiError::Validation(_) => 400,
            ApiError::Unauthorized { status, .. } => *status,
            ApiError::NotFound => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Unavailable => 503,
            ApiError::Server { status, .. } | ApiError::Status { status, .. } => *status,
        }
    }

    /// Passes 2xx responses through and classifies everything else.
    pub fn check(response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if response.is_success() {
            return Ok(response);
        }
        Err(Self::from_response(&response))
    }

    /// Classifies a non-2xx response.
    ///
    /// # Arguments
    /// * `response` - The response to classify
    ///
    /// # Returns
    /// [`ApiError::Validation`] for a 400 carrying field errors, an authorization
    /// error for 401 and 403, [`ApiError::Status`] otherwise.
    pub fn from_response(response: &HttpResponse) -> Self {
        let status = response.status;
        let body = response.body.clone();
        match status {
            400 => match field_errors(&body) {
                Some(errors) => ApiError::Validation(errors),
                None => ApiError::Status { status, body },
            },
            401 | 403 => ApiError::Unauthorized {
                status,
                message: body_error(&body),
            },
            404 => ApiError::NotFound,
            409 => ApiError::Conflict(body_error(&body)),
            503 => ApiError::Unavailable,
            500..=599 => ApiError::Server { status, body },
            _ => ApiError::Status { status, body },
        }
    }
}

/// Reads `{ "errors": { field: message } }` out of a body. A field may carry
/// a list of messages, which are joined.
pub fn field_errors(body: &str) -> Option<BTreeMap<String, String>> {
    let value: Value = serde_json::from_str(body).ok()?;
    let errors = value.get("errors")?.as_object()?;
    let map = errors
        .iter()
        .filter_map(|(field, message)| {
            let text = match message {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => return None,
            };
            Some((field.clone(), text))
        })
        .collect();
    Some(map)
}

/// Reads the `error` (or `message`) string of a JSON body.
pub fn body_error(body: &str) -> Option<ArcStr> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(ArcStr::from)
}
