//! Entity kinds and the trait every persisted record implements.
//!
//! An [`Entity`] knows which REST resource it lives under, how to report its identifier,
//! and which denormalized display names it carries. The generic entity service, view
//! controllers, event bus and lookup cache are all written against this trait.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Every entity type the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Channel,
    Code,
    CostFactor,
    Factor,
    ProfitFactor,
    Style,
    Types,
    TransactionDetails,
    Transactions,
    /// Only used to resolve `clientsName`; clients have no screens of their own.
    Client,
}

impl EntityKind {
    /// Entity kinds with list, detail and dialog routes.
    pub const ROUTED: [EntityKind; 9] = [
        EntityKind::Channel,
        EntityKind::Code,
        EntityKind::CostFactor,
        EntityKind::Factor,
        EntityKind::ProfitFactor,
        EntityKind::Style,
        EntityKind::Types,
        EntityKind::TransactionDetails,
        EntityKind::Transactions,
    ];

    /// Plural REST resource name under `api/`.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::Channel => "channels",
            EntityKind::Code => "codes",
            EntityKind::CostFactor => "cost-factors",
            EntityKind::Factor => "factors",
            EntityKind::ProfitFactor => "profit-factors",
            EntityKind::Style => "styles",
            EntityKind::Types => "types",
            EntityKind::TransactionDetails => "transaction-details",
            EntityKind::Transactions => "transactions",
            EntityKind::Client => "clients",
        }
    }

    /// Path segment used by the router, e.g. `cost-factor` in `cost-factor/:id`.
    pub fn route_segment(self) -> &'static str {
        match self {
            EntityKind::Channel => "channel",
            EntityKind::Code => "code",
            EntityKind::CostFactor => "cost-factor",
            EntityKind::Factor => "factor",
            EntityKind::ProfitFactor => "profit-factor",
            EntityKind::Style => "style",
            EntityKind::Types => "types",
            EntityKind::TransactionDetails => "transaction-details",
            EntityKind::Transactions => "transactions",
            EntityKind::Client => "clients",
        }
    }

    /// Lower camel case name, used for event names and page-title keys.
    pub fn camel_name(self) -> &'static str {
        match self {
            EntityKind::Channel => "channel",
            EntityKind::Code => "code",
            EntityKind::CostFactor => "costFactor",
            EntityKind::Factor => "factor",
            EntityKind::ProfitFactor => "profitFactor",
            EntityKind::Style => "style",
            EntityKind::Types => "types",
            EntityKind::TransactionDetails => "transactionDetails",
            EntityKind::Transactions => "transactions",
            EntityKind::Client => "clients",
        }
    }

    /// Name of the change event for this kind, e.g. `costFactorListModification`.
    pub fn event_name(self) -> String {
        format!("{}ListModification", self.camel_name())
    }

    /// Page-title key shown by the shell for this kind's routes.
    pub fn page_title(self) -> String {
        format!("quanlysoApp.{}.home.title", self.camel_name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.camel_name())
    }
}

/// Reference from a record to another record whose display name is shown alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl NameRef {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }
}

/// A persisted business record exposed through its own REST resource.
///
/// A record with no identifier has not been persisted yet; saving it creates it. A record
/// with an identifier is updated in place.
pub trait Entity:
    Clone + Default + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The kind of this entity.
    const KIND: EntityKind;

    /// Server-assigned identifier, `None` until the record is created.
    fn id(&self) -> Option<i64>;

    /// Copy sent over the wire on create and update.
    ///
    /// Entities override this to drop properties that only exist on the client.
    fn convert(&self) -> Self {
        self.clone()
    }

    /// Related records whose display names this record shows.
    fn name_refs(&self) -> Vec<NameRef> {
        Vec::new()
    }

    /// Stores a resolved display name for the related record of `kind`.
    fn set_display_name(&mut self, _kind: EntityKind, _name: String) {}
}
