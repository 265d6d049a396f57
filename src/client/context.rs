use crate::{
    client::{
        alert::AlertService,
        event::EventBus,
        http::ApiClient,
        lookup::LookupCache,
        service::{AuthService, EntityService, Principal},
    },
    config::DEFAULT_ITEMS_PER_PAGE,
    model::entity::Entity,
};

/// Handles shared by every view controller.
///
/// Built once at startup and passed to each component; clones share the same API token,
/// event bus, alert list, identity and name cache.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub api: ApiClient,
    pub bus: EventBus,
    pub alerts: AlertService,
    pub principal: Principal,
    pub lookup: LookupCache,
    pub items_per_page: usize,
}

impl AppContext {
    pub fn new(api: ApiClient) -> Self {
        Self {
            bus: EventBus::new(),
            alerts: AlertService::new(),
            principal: Principal::new(api.clone()),
            lookup: LookupCache::new(api.clone()),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            api,
        }
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    /// CRUD service for `E` on the shared client.
    pub fn service<E: Entity>(&self) -> EntityService<E> {
        EntityService::new(self.api.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.principal.clone())
    }
}
