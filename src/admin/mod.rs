//! Admin integration - per-view field plans and factory delegation.
//!
//! `ModelAdmin` carries no persistence logic of its own: it computes
//! which fields an admin surface may edit per view, and routes listing,
//! saving and deletion through the entity's registered factory. Physical
//! deletes never reach the database; they are converted to soft deletes.

use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ID_FIELD, LOCKED_FIELD};
use crate::errors::AppResult;
use crate::factory::{FactoryRegistry, ManagedEntity};
use crate::types::{Mapping, Selection};

/// Admin view kinds with distinct field-visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    Add,
    Change,
}

/// Field plan for one admin form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    /// Fields rendered but not editable.
    pub readonly_fields: Vec<String>,
    /// Fields left out of the form entirely.
    pub exclude: Vec<String>,
}

/// Admin controller for one managed entity.
pub struct ModelAdmin<E: ManagedEntity>
where
    E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
{
    registry: Arc<FactoryRegistry>,
    force_exclude: Vec<String>,
    list_display: Vec<String>,
    entity: PhantomData<E>,
}

impl<E: ManagedEntity + 'static> ModelAdmin<E>
where
    E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
{
    pub fn new(registry: Arc<FactoryRegistry>) -> Self {
        Self {
            registry,
            force_exclude: Vec::new(),
            list_display: vec![ID_FIELD.to_string()],
            entity: PhantomData,
        }
    }

    /// Fields excluded from every view, on top of the per-view rules.
    pub fn with_force_exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_exclude = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Columns shown in the list view. The identifier always comes
    /// first, whether or not it is passed here.
    pub fn with_list_display<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list_display = std::iter::once(ID_FIELD.to_string())
            .chain(
                fields
                    .into_iter()
                    .map(Into::into)
                    .filter(|field| field != ID_FIELD),
            )
            .collect();
        self
    }

    pub fn list_display(&self) -> &[String] {
        &self.list_display
    }

    /// Field plan for a view.
    ///
    /// Add: every mapped base field is excluded from the form (they are
    /// only ever set programmatically), the lock flag too; nothing is
    /// read-only. Change: the mapped base fields and the lock flag are
    /// read-only; excludes revert to the forced excludes.
    pub fn form_fields(&self, view: AdminView) -> FormFields {
        match view {
            AdminView::Add => {
                let mut exclude: Vec<String> =
                    E::base_fields().iter().map(|f| f.to_string()).collect();
                exclude.extend(self.force_exclude.iter().cloned());
                push_unique(&mut exclude, LOCKED_FIELD);

                FormFields {
                    readonly_fields: Vec::new(),
                    exclude,
                }
            }
            AdminView::Change => {
                let mut readonly_fields: Vec<String> =
                    E::base_fields().iter().map(|f| f.to_string()).collect();
                push_unique(&mut readonly_fields, LOCKED_FIELD);

                FormFields {
                    readonly_fields,
                    exclude: self.force_exclude.clone(),
                }
            }
        }
    }

    /// List records through the registered factory's default selection
    /// (live records only). A missing registration surfaces as
    /// [`AppError::FactoryMissing`](crate::errors::AppError::FactoryMissing);
    /// callers that want the unmanaged listing instead use
    /// [`default_queryset`](Self::default_queryset).
    pub async fn queryset(&self) -> AppResult<Vec<E::Model>> {
        let factory = self.registry.get::<E>()?;
        factory.select(Selection::default()).await
    }

    /// Unmanaged fallback listing straight off the entity, bypassing the
    /// factory layer (and therefore the soft-delete filter).
    pub async fn default_queryset(&self, db: &DatabaseConnection) -> AppResult<Vec<E::Model>> {
        Ok(E::find().all(db).await?)
    }

    /// Persist an admin form submission: create on the add view, update
    /// on the change view.
    pub async fn save_model(&self, change: Option<i64>, data: Mapping) -> AppResult<E::Model> {
        let factory = self.registry.get::<E>()?;
        match change {
            Some(id) => factory.update(id, data).await,
            None => factory.create(data).await,
        }
    }

    /// Intercept a physical delete request and convert it to a factory
    /// soft delete.
    pub async fn delete_model(&self, id: i64) -> AppResult<E::Model> {
        let factory = self.registry.get::<E>()?;
        factory.delete(id).await
    }
}

fn push_unique(fields: &mut Vec<String>, field: &str) {
    if !fields.iter().any(|f| f == field) {
        fields.push(field.to_string());
    }
}
