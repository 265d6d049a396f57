use dioxus_logger::tracing;
use tokio::sync::watch;

use crate::{
    client::{
        event::{ChangeEvent, Subscription},
        router::{ActivatedRoute, RouteParams},
        service::EntityService,
        AppContext,
    },
    error::Error,
    model::entity::Entity,
};

/// Controller of an entity detail screen.
///
/// Shows the record named by the route's `id` parameter, follows the parameter as it
/// changes and reloads the record on change events for its kind.
pub struct EntityDetail<E: Entity> {
    ctx: AppContext,
    service: EntityService<E>,
    record: Option<E>,
    id: Option<i64>,
    route: Option<watch::Receiver<RouteParams>>,
    subscription: Option<Subscription>,
    load_count: usize,
}

impl<E: Entity> EntityDetail<E> {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            service: ctx.service(),
            record: None,
            id: None,
            route: None,
            subscription: None,
            load_count: 0,
        }
    }

    /// Follows `route` and loads the record it names.
    pub async fn init(&mut self, route: &ActivatedRoute) {
        let mut receiver = route.subscribe();
        let id = parse_id(&receiver.borrow_and_update());
        self.route = Some(receiver);
        self.subscription = Some(self.ctx.bus.subscribe(E::KIND));

        match id {
            Some(id) => {
                let _ = self.load(id).await;
            }
            None => tracing::warn!("{} detail opened without an id", E::KIND),
        }
    }

    /// Fetches record `id` and resolves its display names.
    ///
    /// # Returns
    /// - `Ok(())` - Record replaced
    /// - `Err(Error)` - Fetch failed; alerted, the previous record is kept
    pub async fn load(&mut self, id: i64) -> Result<(), Error> {
        self.id = Some(id);

        let mut record = match self.service.find(id).await {
            Ok(record) => record,
            Err(err) => {
                tracing::error!("Failed to load {} {}: {}", E::KIND, id, err);
                self.ctx.alerts.error(err.alert_message());
                return Err(err);
            }
        };

        self.ctx
            .lookup
            .resolve_names(std::slice::from_mut(&mut record), &self.ctx.alerts)
            .await;

        self.record = Some(record);
        self.load_count += 1;

        Ok(())
    }

    /// Loads the record named by the route if its `id` changed since last seen.
    ///
    /// # Returns
    /// Whether a different record was requested.
    pub async fn handle_route_change(&mut self) -> bool {
        let Some(receiver) = self.route.as_mut() else {
            return false;
        };
        if !receiver.has_changed().unwrap_or(false) {
            return false;
        }

        let id = parse_id(&receiver.borrow_and_update());
        match id {
            Some(id) if Some(id) != self.id => {
                let _ = self.load(id).await;
                true
            }
            _ => false,
        }
    }

    /// Reloads the shown record once for every pending change event.
    ///
    /// # Returns
    /// The number of events handled.
    pub async fn process_events(&mut self) -> usize {
        let mut handled = 0;

        while let Some(event) = self.subscription.as_mut().and_then(Subscription::try_recv) {
            self.reload(&event).await;
            handled += 1;
        }

        handled
    }

    /// Waits for the next change event and reloads.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        let event = self.subscription.as_mut()?.recv().await?;
        self.reload(&event).await;
        Some(event)
    }

    /// Releases the route and event subscriptions. Calling it again does nothing.
    pub fn destroy(&mut self) {
        self.route = None;
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.route.is_some() || self.subscription.is_some()
    }

    pub fn record(&self) -> Option<&E> {
        self.record.as_ref()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn load_count(&self) -> usize {
        self.load_count
    }

    async fn reload(&mut self, event: &ChangeEvent) {
        if let Some(id) = self.id {
            tracing::debug!("{} received, reloading {} {}", event.name(), E::KIND, id);
            let _ = self.load(id).await;
        }
    }
}

fn parse_id(params: &RouteParams) -> Option<i64> {
    params.get("id").and_then(|id| id.parse().ok())
}
