//! Change-notification bus.
//!
//! Dialogs publish a [`ChangeEvent`] after a successful create, update or delete; list and
//! detail views subscribe to the kind they show and reload when one arrives. The bus is passed
//! to whoever needs it rather than living in a global.
//!
//! Events go through a `tokio::sync::broadcast` channel, so every live subscription receives
//! each event published after it subscribed exactly once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dioxus_logger::tracing;
use tokio::sync::broadcast;

use crate::model::entity::EntityKind;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// What happened to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Created,
    Updated,
    Deleted,
}

/// A mutation of one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub operation: Operation,
    /// ID of the changed record, when known.
    pub id: Option<i64>,
    pub content: String,
}

impl ChangeEvent {
    pub fn new(kind: EntityKind, operation: Operation, id: Option<i64>) -> Self {
        Self {
            kind,
            operation,
            id,
            content: "OK".to_string(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Event name, e.g. `channelListModification`.
    pub fn name(&self) -> String {
        self.kind.event_name()
    }
}

type SubscriptionCounts = Arc<Mutex<HashMap<EntityKind, usize>>>;

/// Publish/subscribe channel for [`ChangeEvent`]s. Clones share the channel.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
    subscriptions: SubscriptionCounts,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribes to the events of one entity kind.
    ///
    /// The subscription only sees events published after this call. Dropping it or calling
    /// [`Subscription::unsubscribe`] releases it.
    pub fn subscribe(&self, kind: EntityKind) -> Subscription {
        let receiver = self.sender.subscribe();

        if let Ok(mut subs) = self.subscriptions.lock() {
            *subs.entry(kind).or_insert(0) += 1;
        }
        tracing::debug!("Subscribed to {}", kind.event_name());

        Subscription {
            receiver: Some(receiver),
            kind,
            subscriptions: self.subscriptions.clone(),
        }
    }

    /// Publishes an event.
    ///
    /// # Returns
    /// The number of live subscriptions for the event's kind.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let name = event.name();
        let interested = self.subscriber_count(event.kind);

        if self.sender.send(event).is_err() {
            tracing::debug!("Event {} dropped (no subscribers)", name);
            return 0;
        }
        tracing::debug!("Event {} published to {} subscriber(s)", name, interested);

        interested
    }

    /// Number of live subscriptions for `kind`.
    pub fn subscriber_count(&self, kind: EntityKind) -> usize {
        self.subscriptions
            .lock()
            .ok()
            .and_then(|subs| subs.get(&kind).copied())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscription to one entity kind's events.
#[derive(Debug)]
pub struct Subscription {
    receiver: Option<broadcast::Receiver<ChangeEvent>>,
    kind: EntityKind,
    subscriptions: SubscriptionCounts,
}

impl Subscription {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Waits for the next event of this kind.
    ///
    /// # Returns
    /// - `Some(event)` - The next event
    /// - `None` - Unsubscribed, or every bus handle was dropped
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        let kind = self.kind;
        let receiver = self.receiver.as_mut()?;

        loop {
            match receiver.recv().await {
                Ok(event) if event.kind == kind => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::warn!("{} subscriber lagged, {} event(s) dropped", kind, count);
                    continue;
                }
            }
        }
    }

    /// Takes the next pending event of this kind without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        let kind = self.kind;
        let receiver = self.receiver.as_mut()?;

        loop {
            match receiver.try_recv() {
                Ok(event) if event.kind == kind => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    tracing::warn!("{} subscriber lagged, {} event(s) dropped", kind, count);
                    continue;
                }
                Err(_) => return None,
            }
        }
    }

    /// Releases the subscription. Calling it again does nothing.
    pub fn unsubscribe(&mut self) {
        if self.receiver.take().is_none() {
            return;
        }

        let Ok(mut subs) = self.subscriptions.lock() else {
            return;
        };
        if let Some(count) = subs.get_mut(&self.kind) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                subs.remove(&self.kind);
            }
        }
        tracing::debug!("Unsubscribed from {}", self.kind.event_name());
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
