//! Reference entities used as lookup lists: factors, styles and types.

use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Entity for Factor {
    const KIND: EntityKind = EntityKind::Factor;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Entity for Style {
    const KIND: EntityKind = EntityKind::Style;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Types {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Entity for Types {
    const KIND: EntityKind = EntityKind::Types;

    fn id(&self) -> Option<i64> {
        self.id
    }
}
