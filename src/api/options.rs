use super::{ApiError, OptionKind, SandwichOption, endpoint};
use crate::{ArcStr, net::Net};

/// Client for `GET /api/options/{kind}`.
#[derive(Debug, Clone)]
pub struct OptionsApi {
    net: Net,
    base_url: ArcStr,
}

impl OptionsApi {
    /// Creates the option client.
    ///
    /// # Arguments
    /// * `net` - The networking actor
    /// * `base_url` - Backend root, without a trailing slash
    pub fn new(net: Net, base_url: ArcStr) -> Self {
        Self { net, base_url }
    }

    /// Fetches the options of `kind`. Labels are trimmed and a `null` body
    /// reads as an empty list.
    pub async fn list(&self, kind: OptionKind) -> Result<Vec<SandwichOption>, ApiError> {
        let url = endpoint(&self.base_url, &format!("/api/options/{kind}"));
        let response = self
            .net
            .get(url)
            .await
            .map_err(|e| ApiError::Network(format!("{e:#}").into()))?;
        let response = ApiError::check(response)?;

        let options: Option<Vec<SandwichOption>> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Decode(format!("{kind}: {e}").into()))?;
        Ok(options
            .unwrap_or_default()
            .into_iter()
            .map(|opt| SandwichOption::new(opt.id, opt.label.trim()))
            .collect())
    }
}
