use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::CategoryId;

/// Form field that routes a submission on pages hosting several forms.
pub const SUBJECT_FIELD: &str = "_subject";

pub mod fields {
    pub const NAME: &str = "name";
    pub const PIZZA_UUID: &str = "pizzaUUID";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Subject {
    PageCategory,
}

impl Subject {
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::PageCategory => "pageCategory",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pageCategory" => Some(Subject::PageCategory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaSummary {
    pub uuid: Uuid,
    pub name: String,
    /// Price in euro cents.
    pub price: i64,
}

/// Euro cents to `7.50€`.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}€", cents / 100, cents % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category_id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Loader data of the lunch order page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PizzaPageView {
    pub pizzas: Vec<PizzaSummary>,
    #[serde(rename = "pizzaUUID", default)]
    pub pizza_uuid: Option<Uuid>,
    pub status: u16,
}

/// Loader data of the page admin modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPageView {
    pub categories: Vec<CategorySummary>,
    pub status: u16,
}

/// Action data. `headers` never reaches the client body, it is lifted into
/// real response headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub did: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
}
