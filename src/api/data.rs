use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ArcStr, net::HttpResponse};

/// The five categories of sandwich ingredients, in display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Breads,
    Cheeses,
    Dressings,
    Meats,
    Toppings,
}

impl OptionKind {
    pub const ALL: [OptionKind; 5] = [
        OptionKind::Breads,
        OptionKind::Cheeses,
        OptionKind::Dressings,
        OptionKind::Meats,
        OptionKind::Toppings,
    ];

    /// Wire name, also used in `/api/options/{kind}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Breads => "breads",
            OptionKind::Cheeses => "cheeses",
            OptionKind::Dressings => "dressings",
            OptionKind::Meats => "meats",
            OptionKind::Toppings => "toppings",
        }
    }

    /// Singular label used in summaries and descriptions.
    pub fn title(&self) -> &'static str {
        match self {
            OptionKind::Breads => "Bread",
            OptionKind::Cheeses => "Cheese",
            OptionKind::Dressings => "Dressing",
            OptionKind::Meats => "Meat",
            OptionKind::Toppings => "Toppings",
        }
    }

    /// Fields of a validation error that belong to this kind.
    pub fn error_fields(&self) -> &'static [&'static str] {
        match self {
            OptionKind::Breads => &["breadId", "breadIds"],
            OptionKind::Cheeses => &["cheeseIds", "cheeseId"],
            OptionKind::Dressings => &["dressingIds", "dressingId"],
            OptionKind::Meats => &["meatIds", "meatId"],
            OptionKind::Toppings => &["toppingIds", "toppingId"],
        }
    }
}

impl Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        OptionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.title().to_lowercase() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown option kind: {s}"))
    }
}

/// One selectable ingredient.
///
/// Some backends send `Id`/`Label`, both casings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SandwichOption {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Label")]
    pub label: String,
}

impl SandwichOption {
    /// Creates an option.
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A sandwich as returned by the backend.
///
/// The composition fields are only present on backends that store the
/// structured selection. Otherwise only `description` describes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandwich {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub toasted: Option<bool>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub owner_user_id: Option<Value>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub bread_id: Option<i64>,
    #[serde(default)]
    pub cheese_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub dressing_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub meat_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub topping_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub no_cheese: Option<bool>,
    #[serde(default)]
    pub no_dressing: Option<bool>,
    #[serde(default)]
    pub no_meat: Option<bool>,
    #[serde(default)]
    pub no_toppings: Option<bool>,
}

impl Sandwich {
    /// Whether the backend sent the structured selection.
    pub fn has_composition(&self) -> bool {
        self.bread_id.is_some()
            || self.cheese_ids.is_some()
            || self.dressing_ids.is_some()
            || self.meat_ids.is_some()
            || self.topping_ids.is_some()
    }

    /// The free text description, empty when the backend sent none.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SandwichPayload {
    pub name: String,
    pub bread_id: Option<i64>,
    pub cheese_ids: Vec<i64>,
    pub dressing_ids: Vec<i64>,
    pub meat_ids: Vec<i64>,
    pub topping_ids: Vec<i64>,
    pub no_cheese: bool,
    pub no_dressing: bool,
    pub no_meat: bool,
    pub no_toppings: bool,
    pub toasted: bool,
    pub price: Option<f64>,
}

/// Normalized outcome of an auth call.
///
/// Auth calls never fail: transport errors come back with status `0` and
/// the error text in `body.error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub ok: bool,
    pub status: u16,
    /// Parsed JSON body, `None` when empty or not JSON
    pub body: Option<Value>,
    pub body_text: Option<ArcStr>,
}

impl ApiResult {
    /// Wraps a response, parsing the body as JSON when it is JSON.
    ///
    /// # Arguments
    /// * `response` - The raw response
    ///
    /// # Returns
    /// A result whose `ok` follows the status code.
    pub fn from_response(response: &HttpResponse) -> Self {
        let text = &*response.body;
        Self {
            ok: response.is_success(),
            status: response.status,
            body: serde_json::from_str(text).ok(),
            body_text: Some(response.body.clone()),
        }
    }

    /// A result produced without a usable response.
    pub fn failure(status: u16, error: impl Into<String>, body_text: impl Into<ArcStr>) -> Self {
        Self {
            ok: false,
            status,
            body: Some(json!({ "error": error.into() })),
            body_text: Some(body_text.into()),
        }
    }

    /// String field of the body.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body.as_ref()?.get(name)?.as_str()
    }

    /// Boolean field of the body. Missing or non-boolean reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.body
            .as_ref()
            .and_then(|b| b.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The `error` message of the body.
    pub fn error(&self) -> Option<&str> {
        self.field("error")
    }

    /// The bearer token of a successful login.
    pub fn token(&self) -> Option<&str> {
        self.field("token")
    }

    /// Whether the login has to be completed with a one-time code.
    pub fn requires_mfa(&self) -> bool {
        self.flag("requiresMfa")
    }

    /// The token to send back with the one-time code.
    pub fn mfa_token(&self) -> Option<&str> {
        self.field("mfaToken")
    }
}
