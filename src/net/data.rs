use std::fmt::Display;

use crate::ArcStr;

/// HTTP methods used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{name}")
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: ArcStr,
    pub headers: Vec<(ArcStr, ArcStr)>,
    pub body: Option<ArcStr>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<ArcStr>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A GET request. Carries the headers that keep proxies and the backend
    /// from answering with a cached copy.
    pub fn get(url: impl Into<ArcStr>) -> Self {
        Self::new(HttpMethod::Get, url)
            .header("Cache-Control", "no-cache, no-store, must-revalidate")
            .header("Pragma", "no-cache")
            .header("Expires", "0")
    }

    /// A POST to `url`.
    pub fn post(url: impl Into<ArcStr>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// A PUT to `url`.
    pub fn put(url: impl Into<ArcStr>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// A DELETE to `url`.
    pub fn delete(url: impl Into<ArcStr>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Adds a header, replacing any with the same name.
    pub fn header(mut self, name: impl Into<ArcStr>, value: impl Into<ArcStr>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds `Authorization: Bearer <token>` when a token is given.
    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header("Authorization", format!("Bearer {token}")),
            None => self,
        }
    }

    /// Sets a JSON body along with the matching content headers.
    pub fn json(mut self, body: impl Into<ArcStr>) -> Self {
        self.body = Some(body.into());
        self.header("Content-Type", "application/json")
            .header("Accept", "application/json")
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| &**v)
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: ArcStr,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<ArcStr>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
