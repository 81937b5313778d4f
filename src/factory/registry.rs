//! Explicit factory registration.
//!
//! The registry is the process-wide table mapping entity types to their
//! single shared factory instance. It is populated once at startup and
//! passed by reference to consumers; lookup is by entity type and a miss
//! is an explicit error the caller decides how to handle.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::IntoActiveModel;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, AppResult};

use super::{Factory, ManagedEntity};

/// Registration table: entity type -> shared factory instance.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register the factory for an entity type. Registering the same
    /// entity twice is an error: every consumer must share one instance.
    pub fn register<E>(&mut self, factory: Arc<Factory<E>>) -> AppResult<()>
    where
        E: ManagedEntity + 'static,
        E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
    {
        let type_id = TypeId::of::<E>();
        if self.factories.contains_key(&type_id) {
            return Err(AppError::DuplicateFactory(E::factory_name()));
        }

        self.factories.insert(type_id, Box::new(factory));
        tracing::debug!(factory = E::factory_name(), "Factory registered");
        Ok(())
    }

    /// Look up the factory for an entity type.
    pub fn get<E>(&self) -> AppResult<Arc<Factory<E>>>
    where
        E: ManagedEntity + 'static,
        E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
    {
        self.factories
            .get(&TypeId::of::<E>())
            .and_then(|entry| entry.downcast_ref::<Arc<Factory<E>>>())
            .cloned()
            .ok_or(AppError::FactoryMissing(E::factory_name()))
    }

    pub fn contains<E>(&self) -> bool
    where
        E: ManagedEntity + 'static,
        E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
    {
        self.factories.contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
