use dioxus_logger::tracing;

use crate::{
    client::{
        event::{ChangeEvent, Operation},
        service::EntityService,
        AppContext,
    },
    error::Error,
    model::entity::{Entity, NameRef},
};

/// Create/edit form of an entity.
pub struct EntityDialog<E: Entity> {
    ctx: AppContext,
    service: EntityService<E>,
    entity: E,
    is_saving: bool,
}

impl<E: Entity> EntityDialog<E> {
    /// Opens the dialog on a blank record.
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            service: ctx.service(),
            entity: E::default(),
            is_saving: false,
        }
    }

    /// Loads record `id` for editing, or starts a blank record when `id` is `None`.
    pub async fn open(&mut self, id: Option<i64>) -> Result<(), Error> {
        self.entity = match id {
            Some(id) => self.service.find(id).await.inspect_err(|err| {
                tracing::error!("Failed to open {} {}: {}", E::KIND, id, err);
                self.ctx.alerts.error(err.alert_message());
            })?,
            None => E::default(),
        };

        Ok(())
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Creates the record when it has no ID and updates it otherwise.
    ///
    /// On success the saved record replaces the form, its cached name is dropped and a
    /// `Created` or `Updated` event is published. Failures are alerted.
    pub async fn save(&mut self) -> Result<E, Error> {
        let operation = match self.entity.id() {
            Some(_) => Operation::Updated,
            None => Operation::Created,
        };

        self.is_saving = true;
        let result = self.service.save(&self.entity).await;
        self.is_saving = false;

        match result {
            Ok(saved) => {
                if let Some(id) = saved.id() {
                    self.ctx.lookup.invalidate(NameRef::new(E::KIND, id));
                }
                self.ctx
                    .bus
                    .publish(ChangeEvent::new(E::KIND, operation, saved.id()));
                self.entity = saved.clone();
                Ok(saved)
            }
            Err(err) => {
                tracing::error!("Failed to save {}: {}", E::KIND, err);
                self.ctx.alerts.error(err.alert_message());
                Err(err)
            }
        }
    }
}

/// Delete confirmation of an entity.
pub struct DeleteDialog<E: Entity> {
    ctx: AppContext,
    service: EntityService<E>,
}

impl<E: Entity> DeleteDialog<E> {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            service: ctx.service(),
        }
    }

    /// Deletes record `id`, drops its cached name and publishes a `Deleted` event.
    pub async fn confirm_delete(&self, id: i64) -> Result<(), Error> {
        if let Err(err) = self.service.delete(id).await {
            tracing::error!("Failed to delete {} {}: {}", E::KIND, id, err);
            self.ctx.alerts.error(err.alert_message());
            return Err(err);
        }

        self.ctx.lookup.invalidate(NameRef::new(E::KIND, id));
        self.ctx
            .bus
            .publish(ChangeEvent::new(E::KIND, Operation::Deleted, Some(id)));

        Ok(())
    }
}
