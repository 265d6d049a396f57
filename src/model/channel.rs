use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityKind};

/// A service channel, open on a given day of the week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
    /// Lowercase weekday label, e.g. `saturday`.
    pub open_day: Option<String>,
}

impl Entity for Channel {
    const KIND: EntityKind = EntityKind::Channel;

    fn id(&self) -> Option<i64> {
        self.id
    }
}
