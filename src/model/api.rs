use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error body returned by the API on a failed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDto {
    /// Message key, e.g. `error.validation`
    pub message: Option<String>,
    /// Human readable description of the failure
    pub description: Option<String>,
    /// Per-field validation failures
    #[serde(default)]
    pub field_errors: Vec<FieldErrorDto>,
}

impl ErrorDto {
    /// The text to show the user: the description when present, otherwise the message.
    pub fn into_message(self) -> Option<String> {
        self.description.or(self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrorDto {
    pub object_name: Option<String>,
    pub field: Option<String>,
    pub message: Option<String>,
}

/// Credentials posted to `api/authenticate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

/// Token returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub id_token: String,
}

/// The part of any named record needed to show it as a reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameDto {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// One page of a collection query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of records across all pages, from `X-Total-Count`.
    pub total_count: Option<u64>,
    /// Page number for each `Link` relation (`first`, `prev`, `next`, `last`).
    pub links: BTreeMap<String, usize>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_count: None,
            links: BTreeMap::new(),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
