//! Mapping objects - plain field-bags applied to records.
//!
//! A `Mapping` carries field names and values for one factory call:
//! attribute values for `create`/`update`, equality filters for
//! `select`/`get_item`. Fields are kept in a sorted map so iteration
//! order (and therefore cache-key generation) is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DELETED_FIELD;
use crate::errors::AppResult;
use crate::factory::ManagedEntity;

/// Plain carrier of field names/values, consumed once per factory call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    fields: BTreeMap<String, Value>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapping used by logical deletes: `is_deleted = true`.
    pub fn deleted() -> Self {
        Self::new().set(DELETED_FIELD, true)
    }

    /// Set a field from any directly convertible value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Set a field from any serializable value (timestamps, enums, ...).
    pub fn try_set(mut self, field: impl Into<String>, value: impl Serialize) -> AppResult<Self> {
        self.fields.insert(field.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Set a record-reference field. The referenced record is resolved to
    /// its id, never embedded.
    pub fn set_record<E: ManagedEntity>(self, field: impl Into<String>, record: &E::Model) -> Self
    where
        E::Model: Serialize
            + serde::de::DeserializeOwned
            + sea_orm::IntoActiveModel<E::Active>
            + Send
            + Sync,
    {
        self.set(field, E::record_id(record))
    }

    /// Remove a field, returning its previous value.
    pub fn unset(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate fields in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Render the mapping as a JSON object for application onto an
    /// active model.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
