//! Error types for the quanlyso client.
//!
//! Failures are grouped by where they happen: configuration, transport, an HTTP error status
//! returned by the API, or a response body that does not match its schema. Every error can be
//! turned into the text shown in the alert channel with [`Error::alert_message`].

pub mod config;

use thiserror::Error;

use crate::{
    error::config::ConfigError,
    model::{api::ErrorDto, entity::EntityKind},
};

/// Main error type for the quanlyso client.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Network or transport failure, the request never produced a response.
    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with an error status.
    ///
    /// `message` is taken from the error body when it is JSON, otherwise it is the raw body.
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },
    /// The response body did not match the expected schema.
    #[error("Failed to parse response body: {0}")]
    Decode(String),
    /// An update or delete was requested for a record that has no ID.
    #[error("Missing ID for {0} entity")]
    MissingId(EntityKind),
    /// No user is signed in.
    #[error("Not authenticated")]
    Unauthenticated,
}

impl Error {
    /// Builds an [`Error::Api`] from an error status and the raw response body.
    ///
    /// The body is read as an [`ErrorDto`] first; when it is not JSON the raw text is used, and
    /// when it is empty the status reason is used.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorDto>(body) {
            Ok(dto) => dto.into_message(),
            Err(_) => None,
        };

        let message = message.unwrap_or_else(|| {
            if body.trim().is_empty() {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.to_string()
            }
        });

        Error::Api { status, message }
    }

    /// HTTP status of an [`Error::Api`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text shown to the user in the alert channel.
    pub fn alert_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            err => err.to_string(),
        }
    }
}
