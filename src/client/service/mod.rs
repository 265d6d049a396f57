//! Entity services: the translation boundary between view controllers and the REST API.
//!
//! A single generic [`EntityService`] performs CRUD against `api/<entity-plural>` for any
//! [`Entity`]. Entity-specific lookups that the collection endpoint does not support, such as
//! channels by open day, are added as inherent methods in the submodules.

pub mod account;
pub mod channel;
pub mod cost_factor;

use std::marker::PhantomData;

use dioxus_logger::tracing;
use reqwest::{header::HeaderMap, Method};

use crate::{
    client::{http::ApiClient, pagination::parse_links},
    error::Error,
    model::{api::Page, entity::Entity},
};

pub use account::{AuthService, Principal};

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Optional paging, sorting and search parameters of a collection query.
///
/// Only the parameters that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Vec<String>,
    pub query: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: Vec<String>) -> Self {
        self.sort = sort;
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Query string pairs, one `sort` pair per sort value.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        for sort in &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        if let Some(query) = &self.query {
            pairs.push(("query".to_string(), query.clone()));
        }

        pairs
    }
}

/// CRUD operations for one entity type against its REST resource.
pub struct EntityService<E> {
    api: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }

    /// Resource path, e.g. `api/cost-factors`.
    pub fn resource_url() -> String {
        format!("api/{}", E::KIND.resource())
    }

    /// Creates a new record.
    ///
    /// # Arguments
    /// - `entity` - Record to create; its converted copy is sent as the body
    ///
    /// # Returns
    /// - `Ok(E)` - The record as stored by the server, including its generated ID
    /// - `Err(Error::Api)` - The server rejected the payload
    /// - `Err(Error::Transport)` - The request could not be sent
    pub async fn create(&self, entity: &E) -> Result<E, Error> {
        tracing::debug!("Request to create {}", E::KIND);

        let copy = entity.convert();
        let request = self
            .api
            .request(Method::POST, &Self::resource_url())
            .json(&copy);

        let response = self.api.send(request).await?;
        ApiClient::json(response).await
    }

    /// Updates an existing record.
    ///
    /// # Returns
    /// - `Ok(E)` - The updated record
    /// - `Err(Error::MissingId)` - The record has no ID; nothing is sent
    /// - `Err(Error::Api)` - The server rejected the payload
    pub async fn update(&self, entity: &E) -> Result<E, Error> {
        let Some(id) = entity.id() else {
            return Err(Error::MissingId(E::KIND));
        };
        tracing::debug!("Request to update {} : {}", E::KIND, id);

        let copy = entity.convert();
        let request = self
            .api
            .request(Method::PUT, &Self::resource_url())
            .json(&copy);

        let response = self.api.send(request).await?;
        ApiClient::json(response).await
    }

    /// Creates the record when it has no ID, updates it otherwise.
    pub async fn save(&self, entity: &E) -> Result<E, Error> {
        match entity.id() {
            Some(_) => self.update(entity).await,
            None => self.create(entity).await,
        }
    }

    /// Fetches a record by ID.
    ///
    /// # Returns
    /// - `Ok(E)` - The record
    /// - `Err(Error::Api)` with status 404 - No record with this ID
    pub async fn find(&self, id: i64) -> Result<E, Error> {
        tracing::debug!("Request to get {} : {}", E::KIND, id);

        let path = format!("{}/{}", Self::resource_url(), id);
        let response = self.api.send(self.api.request(Method::GET, &path)).await?;
        ApiClient::json(response).await
    }

    /// Fetches one page of the collection.
    ///
    /// Without options no parameters are sent and the server decides the page.
    ///
    /// # Returns
    /// - `Ok(Page<E>)` - Records with the total count and page links from the headers
    /// - `Err(Error::Decode)` - The body was not a list of records
    pub async fn query(&self, options: Option<&RequestOptions>) -> Result<Page<E>, Error> {
        tracing::debug!("Request to get all {}", E::KIND);

        let mut request = self.api.request(Method::GET, &Self::resource_url());
        if let Some(options) = options {
            request = request.query(&options.to_query_pairs());
        }

        let response = self.api.send(request).await?;
        let (total_count, links) = read_paging_headers(response.headers());
        let items: Vec<E> = ApiClient::json(response).await?;

        Ok(Page {
            items,
            total_count,
            links,
        })
    }

    /// Deletes a record by ID.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        tracing::debug!("Request to delete {} : {}", E::KIND, id);

        let path = format!("{}/{}", Self::resource_url(), id);
        self.api
            .send(self.api.request(Method::DELETE, &path))
            .await?;

        Ok(())
    }

    /// Fetches a filtered list from a sub-path of the resource, e.g. `day/monday`.
    pub(crate) async fn find_all_at(&self, sub_path: &str) -> Result<Vec<E>, Error> {
        let path = format!("{}/{}", Self::resource_url(), sub_path);
        let response = self.api.send(self.api.request(Method::GET, &path)).await?;
        ApiClient::json(response).await
    }
}

fn read_paging_headers(
    headers: &HeaderMap,
) -> (Option<u64>, std::collections::BTreeMap<String, usize>) {
    let total_count = headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    let links = headers
        .get(reqwest::header::LINK)
        .and_then(|value| value.to_str().ok())
        .map(parse_links)
        .unwrap_or_default();

    (total_count, links)
}
