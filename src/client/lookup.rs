//! Display names of related records.
//!
//! Records carry foreign keys (`stylesId`, `channelsId`, `clientsId`) whose names are shown
//! next to them. [`LookupCache`] fetches each name once and keeps it until the related record
//! changes, so a list of a hundred cost factors sharing three styles costs three requests.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use dioxus_logger::tracing;
use futures::future::join_all;
use reqwest::Method;

use crate::{
    client::{alert::AlertService, http::ApiClient},
    error::Error,
    model::{
        api::NameDto,
        entity::{Entity, EntityKind, NameRef},
    },
};

/// Cache of (entity kind, id) to display name. Clones share the cache.
#[derive(Clone, Debug)]
pub struct LookupCache {
    api: ApiClient,
    names: Arc<Mutex<HashMap<NameRef, String>>>,
}

impl LookupCache {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            names: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Display name of a related record, fetched on a miss.
    ///
    /// # Returns
    /// - `Ok(Some(name))` - The record has a name
    /// - `Ok(None)` - The record exists but has no name
    /// - `Err(Error)` - The record could not be fetched
    pub async fn name_of(&self, reference: NameRef) -> Result<Option<String>, Error> {
        if let Some(name) = self.get(reference) {
            return Ok(Some(name));
        }

        tracing::debug!(
            "Request to get {} name : {}",
            reference.kind,
            reference.id
        );
        let path = format!("api/{}/{}", reference.kind.resource(), reference.id);
        let response = self.api.send(self.api.request(Method::GET, &path)).await?;
        let dto: NameDto = ApiClient::json(response).await?;

        if let Some(name) = &dto.name {
            self.insert(reference, name.clone());
        }

        Ok(dto.name)
    }

    /// Cached name, without fetching.
    pub fn get(&self, reference: NameRef) -> Option<String> {
        self.names
            .lock()
            .ok()
            .and_then(|names| names.get(&reference).cloned())
    }

    pub fn insert(&self, reference: NameRef, name: String) {
        if let Ok(mut names) = self.names.lock() {
            names.insert(reference, name);
        }
    }

    /// Drops one cached name.
    pub fn invalidate(&self, reference: NameRef) {
        if let Ok(mut names) = self.names.lock() {
            names.remove(&reference);
        }
    }

    /// Drops every cached name of one kind.
    pub fn invalidate_kind(&self, kind: EntityKind) {
        if let Ok(mut names) = self.names.lock() {
            names.retain(|reference, _| reference.kind != kind);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut names) = self.names.lock() {
            names.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.names.lock().map(|names| names.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills in the display names of `records`.
    ///
    /// Every distinct reference is looked up once, concurrently. A failed lookup is logged and
    /// raised as an alert; the records it concerns keep their current name.
    ///
    /// # Returns
    /// The number of failed lookups.
    pub async fn resolve_names<E: Entity>(&self, records: &mut [E], alerts: &AlertService) -> usize {
        let references: BTreeSet<NameRef> = records
            .iter()
            .flat_map(|record| record.name_refs())
            .collect();

        if references.is_empty() {
            return 0;
        }

        let lookups = references.iter().map(|reference| async move {
            (*reference, self.name_of(*reference).await)
        });
        let results = join_all(lookups).await;

        let mut resolved = HashMap::new();
        let mut failures = 0;
        for (reference, result) in results {
            match result {
                Ok(Some(name)) => {
                    resolved.insert(reference, name);
                }
                Ok(None) => {}
                Err(err) => {
                    failures += 1;
                    tracing::warn!(
                        "Failed to resolve {} name for id {}: {}",
                        reference.kind,
                        reference.id,
                        err
                    );
                    alerts.error(err.alert_message());
                }
            }
        }

        for record in records.iter_mut() {
            for reference in record.name_refs() {
                if let Some(name) = resolved.get(&reference) {
                    record.set_display_name(reference.kind, name.clone());
                }
            }
        }

        failures
    }
}
