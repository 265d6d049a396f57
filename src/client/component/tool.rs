//! Transaction entry screen.
//!
//! The tool shows the channels open on the chosen day alongside the factor, style and types
//! lists, and lets the user build one [`Transactions`] with any number of line items before
//! submitting it in a single create.

use chrono::{DateTime, NaiveDate, Utc};
use dioxus_logger::tracing;
use futures::{future::LocalBoxFuture, stream::FuturesUnordered, FutureExt, StreamExt};

use crate::{
    client::{
        event::{ChangeEvent, Operation},
        service::{channel::ChannelService, EntityService},
        AppContext,
    },
    error::Error,
    model::{
        api::Page, Channel, Entity, Factor, Style, TransactionDetails, Transactions, Types,
    },
};

/// Handle to one line item of the transaction being built.
///
/// Handles are never reused, so a handle names exactly one line item for the life of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey(u64);

/// Result of one of the lookup requests, tagged with the list it fills.
enum Lookup {
    Channels(Result<Vec<Channel>, Error>),
    Factors(Result<Page<Factor>, Error>),
    Styles(Result<Page<Style>, Error>),
    Types(Result<Page<Types>, Error>),
}

pub struct ToolComponent {
    ctx: AppContext,
    transactions_service: EntityService<Transactions>,
    channel_service: ChannelService,
    factor_service: EntityService<Factor>,
    style_service: EntityService<Style>,
    types_service: EntityService<Types>,
    channels: Vec<Channel>,
    factors: Vec<Factor>,
    styles: Vec<Style>,
    types: Vec<Types>,
    transactions: Transactions,
    // Parallel to `transactions.transaction_details_dtos`.
    line_keys: Vec<LineKey>,
    next_key: u64,
    day: Option<String>,
    is_process: bool,
}

impl ToolComponent {
    /// Creates the tool with a fresh transaction for the signed-in account.
    pub fn new(ctx: &AppContext) -> Self {
        let mut tool = Self {
            ctx: ctx.clone(),
            transactions_service: ctx.service(),
            channel_service: ctx.service(),
            factor_service: ctx.service(),
            style_service: ctx.service(),
            types_service: ctx.service(),
            channels: Vec::new(),
            factors: Vec::new(),
            styles: Vec::new(),
            types: Vec::new(),
            transactions: Transactions::default(),
            line_keys: Vec::new(),
            next_key: 0,
            day: None,
            is_process: false,
        };
        tool.reset();
        tool
    }

    /// Opens the tool on `today` and loads its lookup lists.
    pub async fn init(&mut self, today: NaiveDate) {
        self.set_open_date(today.and_time(chrono::NaiveTime::MIN).and_utc());
        self.on_open_date_change().await;
    }

    pub fn set_open_date(&mut self, open_date: DateTime<Utc>) {
        self.transactions.open_date = Some(open_date);
    }

    /// Reloads the lookup lists for the weekday of the current open date.
    ///
    /// Channels from the previous day are dropped before the new query is sent.
    pub async fn on_open_date_change(&mut self) {
        let Some(open_date) = self.transactions.open_date else {
            return;
        };

        let day = weekday_label(open_date.date_naive());
        self.channels.clear();
        self.load_lookups(&day).await;
        self.day = Some(day);
    }

    /// Fetches the channels open on `day` and the factor, style and types lists concurrently.
    ///
    /// Each list is stored as soon as its own request settles. A failed list is alerted and
    /// left empty; the others are still filled.
    pub async fn load_lookups(&mut self, day: &str) {
        tracing::debug!("Loading tool lookups for {}", day);

        let channel_service = &self.channel_service;
        let factor_service = &self.factor_service;
        let style_service = &self.style_service;
        let types_service = &self.types_service;

        let mut pending: FuturesUnordered<LocalBoxFuture<'_, Lookup>> = FuturesUnordered::new();
        pending.push(
            async move { Lookup::Channels(channel_service.find_by_open_day(day).await) }
                .boxed_local(),
        );
        pending.push(async move { Lookup::Factors(factor_service.query(None).await) }.boxed_local());
        pending.push(async move { Lookup::Styles(style_service.query(None).await) }.boxed_local());
        pending.push(async move { Lookup::Types(types_service.query(None).await) }.boxed_local());

        while let Some(lookup) = pending.next().await {
            match lookup {
                Lookup::Channels(result) => {
                    self.channels = settle(&self.ctx, "channels", result);
                }
                Lookup::Factors(result) => {
                    self.factors = settle(&self.ctx, "factors", result.map(Page::into_items));
                }
                Lookup::Styles(result) => {
                    self.styles = settle(&self.ctx, "styles", result.map(Page::into_items));
                }
                Lookup::Types(result) => {
                    self.types = settle(&self.ctx, "types", result.map(Page::into_items));
                }
            }
        }
    }

    /// Appends a blank line item.
    pub fn add_record(&mut self) -> LineKey {
        let key = LineKey(self.next_key);
        self.next_key += 1;

        self.transactions
            .transaction_details_dtos
            .push(TransactionDetails::default());
        self.line_keys.push(key);

        key
    }

    /// Removes the line item behind `key`. Unknown keys are ignored.
    ///
    /// # Returns
    /// Whether a line item was removed.
    pub fn remove_record(&mut self, key: LineKey) -> bool {
        let Some(index) = self.line_keys.iter().position(|k| *k == key) else {
            return false;
        };

        self.line_keys.remove(index);
        self.transactions.transaction_details_dtos.remove(index);
        true
    }

    /// Starts a new transaction for the signed-in account with one blank line item.
    pub fn reset(&mut self) {
        self.transactions = Transactions {
            clients_id: self.ctx.principal.account_id(),
            ..Default::default()
        };
        self.line_keys.clear();
        self.add_record();
    }

    /// Submits the transaction with all its line items.
    ///
    /// # Returns
    /// - `Ok(Some(Transactions))` - Created; a `transactionsListModification` event is published
    /// - `Ok(None)` - A submission is already in progress, nothing was sent
    /// - `Err(Error)` - The server rejected the transaction; its message is alerted
    pub async fn check(&mut self) -> Result<Option<Transactions>, Error> {
        if self.is_process {
            return Ok(None);
        }

        self.is_process = true;
        let result = self.transactions_service.create(&self.transactions).await;
        self.is_process = false;

        match result {
            Ok(created) => {
                self.ctx.bus.publish(ChangeEvent::new(
                    Transactions::KIND,
                    Operation::Created,
                    created.id,
                ));
                Ok(Some(created))
            }
            Err(err) => {
                tracing::error!("Failed to submit transaction: {}", err);
                self.ctx.alerts.error(err.alert_message());
                Err(err)
            }
        }
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    pub fn set_chosen_number(&mut self, chosen_number: Option<i64>) {
        self.transactions.chosen_number = chosen_number;
    }

    pub fn set_clients_id(&mut self, clients_id: Option<i64>) {
        self.transactions.clients_id = clients_id;
    }

    /// Line items in order, with their handles.
    pub fn lines(&self) -> impl Iterator<Item = (LineKey, &TransactionDetails)> {
        self.line_keys
            .iter()
            .copied()
            .zip(self.transactions.transaction_details_dtos.iter())
    }

    pub fn line_mut(&mut self, key: LineKey) -> Option<&mut TransactionDetails> {
        let index = self.line_keys.iter().position(|k| *k == key)?;
        self.transactions.transaction_details_dtos.get_mut(index)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn types(&self) -> &[Types] {
        &self.types
    }

    /// Weekday the channels were last loaded for, e.g. `saturday`.
    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    pub fn is_process(&self) -> bool {
        self.is_process
    }
}

/// Lowercase English weekday of `date`, e.g. `saturday`.
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%A").to_string().to_lowercase()
}

fn settle<T>(ctx: &AppContext, what: &str, result: Result<Vec<T>, Error>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        tracing::error!("Failed to load {}: {}", what, err);
        ctx.alerts.error(err.alert_message());
        Vec::new()
    })
}
