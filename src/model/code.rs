use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityKind, NameRef};

/// A code drawn on a channel for a given open date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: Option<String>,
    pub open_date: Option<DateTime<Utc>>,
    pub channels_id: Option<i64>,
    /// Denormalized channel name, filled in by the lookup cache.
    pub channels_name: Option<String>,
}

impl Entity for Code {
    const KIND: EntityKind = EntityKind::Code;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name_refs(&self) -> Vec<NameRef> {
        self.channels_id
            .map(|id| NameRef::new(EntityKind::Channel, id))
            .into_iter()
            .collect()
    }

    fn set_display_name(&mut self, kind: EntityKind, name: String) {
        if kind == EntityKind::Channel {
            self.channels_name = Some(name);
        }
    }
}
