//! Transactions and their line items.
//!
//! [`Transactions`] is an aggregate root: its line items are sent and persisted together
//! with it in a single create or update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::entity::{Entity, EntityKind, NameRef};

/// One line item of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub amount: Option<f64>,
    pub costs: Option<f64>,
    pub profit: Option<f64>,
    pub transactions_id: Option<i64>,
    pub channels_id: Option<i64>,
    pub factors_id: Option<i64>,
    pub styles_id: Option<i64>,
    pub types_id: Option<i64>,
}

impl Entity for TransactionDetails {
    const KIND: EntityKind = EntityKind::TransactionDetails;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// A client's transaction: a chosen number, an open date and its line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transactions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub chosen_number: Option<i64>,
    pub open_date: Option<DateTime<Utc>>,
    pub net_value: Option<f64>,
    pub transaction_details_id: Option<i64>,
    pub clients_id: Option<i64>,
    /// Denormalized client name, filled in by the lookup cache.
    pub clients_name: Option<String>,
    /// Never null: a missing or null list from the server reads as empty.
    #[serde(
        rename = "transactionDetailsDTOs",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub transaction_details_dtos: Vec<TransactionDetails>,
}

impl Entity for Transactions {
    const KIND: EntityKind = EntityKind::Transactions;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name_refs(&self) -> Vec<NameRef> {
        self.clients_id
            .map(|id| NameRef::new(EntityKind::Client, id))
            .into_iter()
            .collect()
    }

    fn set_display_name(&mut self, kind: EntityKind, name: String) {
        if kind == EntityKind::Client {
            self.clients_name = Some(name);
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
