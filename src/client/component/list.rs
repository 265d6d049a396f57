use std::collections::BTreeMap;

use dioxus_logger::tracing;

use crate::{
    client::{
        event::{ChangeEvent, Subscription},
        pagination::{PageWindow, PagingParams},
        service::EntityService,
        AppContext,
    },
    error::Error,
    model::{account::Account, entity::Entity},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Populated,
}

/// Controller of an entity list screen.
///
/// Loads the collection, fills in display names and reloads whenever a change event for its
/// entity kind arrives.
pub struct EntityList<E: Entity> {
    ctx: AppContext,
    service: EntityService<E>,
    records: Vec<E>,
    state: ListState,
    paging: Option<PagingParams>,
    total_items: Option<u64>,
    links: BTreeMap<String, usize>,
    account: Option<Account>,
    subscription: Option<Subscription>,
    load_count: usize,
}

impl<E: Entity> EntityList<E> {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            service: ctx.service(),
            records: Vec::new(),
            state: ListState::Idle,
            paging: None,
            total_items: None,
            links: BTreeMap::new(),
            account: None,
            subscription: None,
            load_count: 0,
        }
    }

    /// Loads pages instead of the whole collection.
    pub fn with_paging(mut self, paging: PagingParams) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Subscribes to change events, loads the records and resolves the current user.
    ///
    /// A failed load is alerted; the list stays subscribed so the next change retries.
    pub async fn init(&mut self) {
        self.subscription = Some(self.ctx.bus.subscribe(E::KIND));

        let _ = self.load_all().await;

        match self.ctx.principal.identity(false).await {
            Ok(account) => self.account = account,
            Err(err) => tracing::error!("Failed to resolve current account: {}", err),
        }
    }

    /// Reloads the records, the current page when paging is set.
    ///
    /// # Returns
    /// - `Ok(())` - Records replaced; failed name lookups are alerted but do not fail the load
    /// - `Err(Error)` - The collection could not be fetched; the previous records are kept
    pub async fn load_all(&mut self) -> Result<(), Error> {
        let previous = self.state;
        self.state = ListState::Loading;

        let options = self.paging.as_ref().map(PagingParams::to_request_options);
        let page = match self.service.query(options.as_ref()).await {
            Ok(page) => page,
            Err(err) => {
                tracing::error!("Failed to load {} list: {}", E::KIND, err);
                self.ctx.alerts.error(err.alert_message());
                self.state = previous;
                return Err(err);
            }
        };

        let mut records = page.items;
        self.ctx
            .lookup
            .resolve_names(&mut records, &self.ctx.alerts)
            .await;

        self.records = records;
        self.total_items = page.total_count;
        self.links = page.links;
        self.state = ListState::Populated;
        self.load_count += 1;

        Ok(())
    }

    /// Moves to page `page` (1-based) and reloads.
    pub async fn load_page(&mut self, page: usize) -> Result<(), Error> {
        let items_per_page = self.ctx.items_per_page;
        let paging = self
            .paging
            .get_or_insert_with(|| PagingParams::new(items_per_page));
        paging.page = page.max(1);

        self.load_all().await
    }

    /// Changes the sort order and reloads the current page.
    pub async fn transition(&mut self, predicate: &str, ascending: bool) -> Result<(), Error> {
        let items_per_page = self.ctx.items_per_page;
        let paging = self
            .paging
            .get_or_insert_with(|| PagingParams::new(items_per_page));
        paging.predicate = predicate.to_string();
        paging.ascending = ascending;

        self.load_all().await
    }

    /// Reloads once for every pending change event.
    ///
    /// # Returns
    /// The number of events handled.
    pub async fn process_events(&mut self) -> usize {
        let mut handled = 0;

        while let Some(event) = self.subscription.as_mut().and_then(Subscription::try_recv) {
            tracing::debug!("{} received, reloading", event.name());
            let _ = self.load_all().await;
            handled += 1;
        }

        handled
    }

    /// Waits for the next change event and reloads.
    ///
    /// # Returns
    /// The event, or `None` once the list is destroyed.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        let event = self.subscription.as_mut()?.recv().await?;
        let _ = self.load_all().await;
        Some(event)
    }

    /// Releases the event subscription. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn paging(&self) -> Option<&PagingParams> {
        self.paging.as_ref()
    }

    pub fn total_items(&self) -> Option<u64> {
        self.total_items
    }

    pub fn links(&self) -> &BTreeMap<String, usize> {
        &self.links
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// Number of completed loads.
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    /// Pager for the current page.
    pub fn pages(&self) -> PageWindow {
        let page = self.paging.as_ref().map_or(1, |paging| paging.page);
        let total = self.total_items.unwrap_or(self.records.len() as u64);
        let items_per_page = self
            .paging
            .as_ref()
            .map_or(self.ctx.items_per_page, |paging| paging.items_per_page);
        PageWindow::for_items(page, total, items_per_page)
    }
}
