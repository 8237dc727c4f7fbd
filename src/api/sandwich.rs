use serde::de::DeserializeOwned;

use super::{ApiError, Sandwich, SandwichPayload, endpoint};
use crate::{
    ArcStr,
    net::{HttpRequest, HttpResponse, Net},
    storage::{Storage, TOKEN_KEY},
};

/// Client for the sandwich endpoints.
///
/// Requests carry the stored bearer token when there is one.
#[derive(Debug, Clone)]
pub struct SandwichApi {
    net: Net,
    base_url: ArcStr,
    storage: Storage,
}

impl SandwichApi {
    /// Creates the sandwich client.
    ///
    /// # Arguments
    /// * `net` - The networking actor
    /// * `base_url` - Backend root, without a trailing slash
    /// * `storage` - Source of the bearer token
    pub fn new(net: Net, base_url: ArcStr, storage: Storage) -> Self {
        Self {
            net,
            base_url,
            storage,
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let token = self.storage.get(TOKEN_KEY).await;
        let response = self
            .net
            .send(request.bearer(token.as_deref()))
            .await
            .map_err(|e| ApiError::Network(format!("{e:#}").into()))?;
        ApiError::check(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(HttpRequest::get(self.url(path))).await?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Decode(format!("{path}: {e}").into()))
    }

    /// `GET /api/sandwiches`
    pub async fn list(&self) -> Result<Vec<Sandwich>, ApiError> {
        let list: Option<Vec<Sandwich>> = self.fetch("/api/sandwiches").await?;
        Ok(list.unwrap_or_default())
    }

    /// `GET /api/sandwiches/mine`, the sandwiches of the logged in user.
    pub async fn mine(&self) -> Result<Vec<Sandwich>, ApiError> {
        let list: Option<Vec<Sandwich>> = self.fetch("/api/sandwiches/mine").await?;
        Ok(list.unwrap_or_default())
    }

    /// `GET /api/sandwiches/{id}`
    pub async fn get(&self, id: i64) -> Result<Sandwich, ApiError> {
        self.fetch(&format!("/api/sandwiches/{id}")).await
    }

    /// `POST /api/builder`. Returns the id of the new sandwich when the
    /// backend reports one.
    pub async fn create(&self, payload: &SandwichPayload) -> Result<Option<i64>, ApiError> {
        let body = encode(payload)?;
        let response = self
            .send(HttpRequest::post(self.url("/api/builder")).json(body))
            .await?;
        Ok(returned_id(&response))
    }

    /// `PUT /api/sandwiches/{id}`. Returns `id` unless the backend reports
    /// another one.
    pub async fn update(&self, id: i64, payload: &SandwichPayload) -> Result<Option<i64>, ApiError> {
        let body = encode(payload)?;
        let response = self
            .send(HttpRequest::put(self.url(&format!("/api/sandwiches/{id}"))).json(body))
            .await?;
        Ok(returned_id(&response).or(Some(id)))
    }

    /// `DELETE /api/sandwiches/{id}`
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.send(HttpRequest::delete(self.url(&format!("/api/sandwiches/{id}"))))
            .await
            .map(|_| ())
    }
}

fn encode(payload: &SandwichPayload) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Decode(e.to_string().into()))
}

fn returned_id(response: &HttpResponse) -> Option<i64> {
    let value: serde_json::Value = serde_json::from_str(&response.body).ok()?;
    value.get("id")?.as_i64()
}
