//! Pricing factors keyed by factor, style and types.
//!
//! Cost factors and profit factors share a shape: a rate plus the three references it
//! applies to. Only the style carries a denormalized display name.

use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityKind, NameRef};

/// Rate charged for a factor/style/types combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostFactor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub rate: Option<f64>,
    pub factors_id: Option<i64>,
    pub styles_id: Option<i64>,
    /// Denormalized style name, filled in by the lookup cache.
    pub styles_name: Option<String>,
    pub types_id: Option<i64>,
}

impl Entity for CostFactor {
    const KIND: EntityKind = EntityKind::CostFactor;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name_refs(&self) -> Vec<NameRef> {
        style_ref(self.styles_id)
    }

    fn set_display_name(&mut self, kind: EntityKind, name: String) {
        if kind == EntityKind::Style {
            self.styles_name = Some(name);
        }
    }
}

/// Rate paid out for a factor/style/types combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitFactor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub rate: Option<f64>,
    pub factors_id: Option<i64>,
    pub styles_id: Option<i64>,
    pub styles_name: Option<String>,
    pub types_id: Option<i64>,
}

impl Entity for ProfitFactor {
    const KIND: EntityKind = EntityKind::ProfitFactor;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name_refs(&self) -> Vec<NameRef> {
        style_ref(self.styles_id)
    }

    fn set_display_name(&mut self, kind: EntityKind, name: String) {
        if kind == EntityKind::Style {
            self.styles_name = Some(name);
        }
    }
}

fn style_ref(styles_id: Option<i64>) -> Vec<NameRef> {
    styles_id
        .map(|id| NameRef::new(EntityKind::Style, id))
        .into_iter()
        .collect()
}
