//! HTTP access to the quanlyso REST API.
//!
//! [`ApiClient`] is the one place requests are built and responses are checked. It joins
//! resource paths onto the configured base URL, attaches the bearer token once a user has
//! signed in, and turns error statuses into [`Error::Api`] with the server's message.

use std::sync::{Arc, RwLock};

use dioxus_logger::tracing;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Shared handle to the REST API.
///
/// Clones share the HTTP connection pool and the bearer token, so signing in through one
/// clone authenticates every service built from it.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a client for the API served at `base_url`.
    ///
    /// # Arguments
    /// - `base_url` - Scheme and host of the backend, e.g. `http://localhost:8080`
    ///
    /// # Returns
    /// - `Ok(ApiClient)` - Client ready to send requests
    /// - `Err(Error::Transport)` - The underlying HTTP client could not be built
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sets or clears the bearer token sent with every request.
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.token.write() {
            *current = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request to `path`, authenticated when a token is set.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));

        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and checks its status.
    ///
    /// # Returns
    /// - `Ok(Response)` - The API answered with a success status
    /// - `Err(Error::Api)` - The API answered with an error status
    /// - `Err(Error::Transport)` - The request could not be sent
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let err = Error::from_response_body(status.as_u16(), &body);
        tracing::debug!("{}", err);

        Err(err)
    }

    /// Reads a success response body as `T`.
    ///
    /// # Returns
    /// - `Ok(T)` - Body matched the expected schema
    /// - `Err(Error::Decode)` - Body was not valid JSON for `T`
    /// - `Err(Error::Transport)` - Body could not be read
    pub async fn json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}
