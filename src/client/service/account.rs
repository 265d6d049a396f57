//! Sign-in and the current user's identity.
//!
//! [`AuthService`] exchanges credentials for a bearer token. [`Principal`] resolves and caches
//! the account behind that token so views and route guards can check authorities without a
//! request each time.

use std::sync::{Arc, Mutex};

use dioxus_logger::tracing;
use reqwest::Method;

use crate::{
    client::http::ApiClient,
    error::Error,
    model::{
        account::Account,
        api::{LoginDto, TokenDto},
    },
};

/// Cached identity of the signed-in user.
///
/// Clones share the cache.
#[derive(Clone, Debug)]
pub struct Principal {
    api: ApiClient,
    // `None` until resolved, `Some(None)` when resolved to "nobody signed in".
    identity: Arc<Mutex<Option<Option<Account>>>>,
}

impl Principal {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            identity: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolves the current account.
    ///
    /// A resolved identity is served from cache unless `force` is set.
    ///
    /// # Returns
    /// - `Ok(Some(Account))` - A user is signed in
    /// - `Ok(None)` - The API answered 401, nobody is signed in
    /// - `Err(Error)` - The account could not be fetched
    pub async fn identity(&self, force: bool) -> Result<Option<Account>, Error> {
        if !force {
            if let Some(cached) = self.cached() {
                return Ok(cached);
            }
        }

        let request = self.api.request(Method::GET, "api/account");
        let account = match self.api.send(request).await {
            Ok(response) => Some(ApiClient::json::<Account>(response).await?),
            Err(err) if err.status() == Some(401) => None,
            Err(err) => return Err(err),
        };

        self.store(Some(account.clone()));
        Ok(account)
    }

    /// Sets the identity directly, e.g. after signing out.
    pub fn authenticate(&self, account: Option<Account>) {
        self.store(Some(account));
    }

    /// Forgets the cached identity so the next call to [`Principal::identity`] fetches it.
    pub fn clear(&self) {
        self.store(None);
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.cached(), Some(Some(_)))
    }

    /// Whether the cached account holds any of `authorities`.
    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        match self.cached() {
            Some(Some(account)) => account.has_any_authority(authorities),
            _ => false,
        }
    }

    /// ID of the cached account.
    pub fn account_id(&self) -> Option<i64> {
        self.cached().flatten().and_then(|account| account.id)
    }

    fn cached(&self) -> Option<Option<Account>> {
        self.identity.lock().ok().and_then(|identity| identity.clone())
    }

    fn store(&self, identity: Option<Option<Account>>) {
        if let Ok(mut current) = self.identity.lock() {
            *current = identity;
        }
    }
}

/// Exchanges credentials for a bearer token on the shared [`ApiClient`].
#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
    principal: Principal,
}

impl AuthService {
    pub fn new(api: ApiClient, principal: Principal) -> Self {
        Self { api, principal }
    }

    /// Signs in and resolves the new identity.
    ///
    /// # Arguments
    /// - `credentials` - Username, password and the remember-me flag
    ///
    /// # Returns
    /// - `Ok(Account)` - Signed in; every clone of the API client now sends the token
    /// - `Err(Error::Api)` with status 401 - The credentials were rejected
    /// - `Err(Error::Unauthenticated)` - The token was issued but the account is not readable
    pub async fn login(&self, credentials: &LoginDto) -> Result<Account, Error> {
        tracing::debug!("Request to authenticate {}", credentials.username);

        let request = self
            .api
            .request(Method::POST, "api/authenticate")
            .json(credentials);
        let response = self.api.send(request).await?;
        let token: TokenDto = ApiClient::json(response).await?;

        self.api.set_token(Some(token.id_token));

        self.principal
            .identity(true)
            .await?
            .ok_or(Error::Unauthenticated)
    }

    /// Drops the token and the cached identity.
    pub fn logout(&self) {
        self.api.set_token(None);
        self.principal.authenticate(None);
    }
}
