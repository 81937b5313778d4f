//! Factory core - generic CRUD and query operations over managed records.
//!
//! A [`Factory`] is the sole data-access API for one entity type. It
//! delegates every non-trivial operation to SeaORM (query sets,
//! transactions, row locks) and adds the record-management glue: the
//! soft-delete filter, lifecycle notifications, advisory lock markers
//! and cached single-record lookups.

use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ColumnType, Condition, DatabaseConnection,
    EntityTrait, IdenStatic, IntoActiveModel, Order, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, Value,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::config::CACHE_PREFIX_ITEM;
use crate::errors::{AppError, AppResult};
use crate::infra::Cache;
use crate::signals::{RecordEvent, SignalHub};
use crate::types::{Mapping, OrderBy, Selection};

mod cache_key;
mod registry;

pub use cache_key::cache_key;
pub use registry::FactoryRegistry;

/// A SeaORM entity managed through a factory.
///
/// Implementors name the identifier, soft-delete and lock columns and a
/// stable factory name used in notifications, lock markers, cache keys
/// and registry diagnostics (conventionally the table name).
pub trait ManagedEntity: EntityTrait
where
    Self::Model: Serialize + DeserializeOwned + IntoActiveModel<Self::Active> + Send + Sync,
{
    /// Active model type used for inserts and updates.
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Default + Send + 'static;

    /// Stable identifier for this entity's factory.
    fn factory_name() -> &'static str;

    /// Column holding the integer primary key.
    fn id_column() -> Self::Column;

    /// Column holding the soft-delete flag.
    fn deleted_column() -> Self::Column;

    /// Column holding the lock flag.
    fn locked_column() -> Self::Column;

    /// Primary key value of a fetched model.
    fn record_id(model: &Self::Model) -> i64;

    /// Mapped base fields managed programmatically. Admin forms never
    /// edit these directly.
    fn base_fields() -> &'static [&'static str] {
        crate::config::BASE_FIELDS
    }
}

/// Generic create/update/delete/select operations over one entity type.
///
/// Factories are constructed once at startup, registered in a
/// [`FactoryRegistry`] and shared by reference; every consumer of an
/// entity goes through the same instance.
pub struct Factory<E: ManagedEntity>
where
    E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
{
    db: DatabaseConnection,
    hub: Arc<SignalHub>,
    cache: Option<Cache>,
    entity: PhantomData<E>,
}

impl<E: ManagedEntity> Factory<E>
where
    E::Model: Serialize + DeserializeOwned + IntoActiveModel<E::Active> + Send + Sync,
{
    pub fn new(db: DatabaseConnection, hub: Arc<SignalHub>) -> Self {
        Self {
            db,
            hub,
            cache: None,
            entity: PhantomData,
        }
    }

    /// Attach a cache handle. Without one, lookups always hit the
    /// database and lock markers are no-ops.
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Get database connection reference
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Insert a new record from a mapping.
    ///
    /// Copies all mapping fields onto a fresh active model, persists it,
    /// emits a `created` notification with the new id and clears any
    /// stale lock marker for that id.
    pub async fn create(&self, data: Mapping) -> AppResult<E::Model> {
        let mut active = <E::Active as Default>::default();
        Self::apply_mapping(&mut active, &data)?;
        let model = active.insert(&self.db).await?;

        let id = E::record_id(&model);
        self.hub
            .notify(RecordEvent::Created {
                factory: E::factory_name(),
                id,
            })
            .await;
        self.clear_lock_marker(id).await;

        Ok(model)
    }

    /// Apply a mapping to an existing record.
    ///
    /// Sets the advisory lock marker, then within a single transaction
    /// row-locks the target (`SELECT ... FOR UPDATE`), applies the field
    /// updates and performs an update-only save. On success an `updated`
    /// notification is emitted and the marker is cleared; on failure the
    /// marker is left to expire on its own TTL.
    pub async fn update(&self, id: i64, data: Mapping) -> AppResult<E::Model> {
        self.set_lock_marker(id).await;

        let model = self.locked_update(id, data).await?;

        self.hub
            .notify(RecordEvent::Updated {
                factory: E::factory_name(),
                id: E::record_id(&model),
            })
            .await;
        self.clear_lock_marker(id).await;

        Ok(model)
    }

    /// Logically delete a record: `update` with `is_deleted = true`,
    /// then a `deleted` notification. The row is never removed.
    pub async fn delete(&self, id: i64) -> AppResult<E::Model> {
        let model = self.update(id, Mapping::deleted()).await?;

        self.hub
            .notify(RecordEvent::Deleted {
                factory: E::factory_name(),
                id: E::record_id(&model),
            })
            .await;

        Ok(model)
    }

    async fn locked_update(&self, id: i64, data: Mapping) -> AppResult<E::Model> {
        let txn = self.db.begin().await?;

        let outcome = async {
            let model = E::find()
                .filter(E::id_column().eq(id))
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(AppError::RecordNotFound)?;

            let mut active = model.into_active_model();
            Self::apply_mapping(&mut active, &data)?;
            Ok::<E::Model, AppError>(active.update(&txn).await?)
        }
        .await;

        match outcome {
            Ok(updated) => {
                txn.commit().await?;
                Ok(updated)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Find a live record by id, `None` when absent or soft-deleted.
    /// Reaching deleted records requires [`select`](Self::select) with
    /// the `force` bypass.
    ///
    /// `for_update` row-locks the record; the lock is only held for the
    /// span of a surrounding transaction.
    pub async fn get_by_id(&self, id: i64, for_update: bool) -> AppResult<Option<E::Model>> {
        let mut query = E::find()
            .filter(E::id_column().eq(id))
            .filter(E::deleted_column().eq(false));
        if for_update {
            query = query.lock_exclusive();
        }
        Ok(query.one(&self.db).await?)
    }

    /// All records, optionally ordered. No soft-delete filter is applied
    /// here; use [`select`](Self::select) for flag-aware listings.
    pub async fn get_all(&self, order_by: Option<OrderBy>) -> AppResult<Vec<E::Model>> {
        let mut query = E::find();
        if let Some(order) = order_by {
            query = query.order_by(Self::column(&order.field)?, order.direction.into());
        }
        Ok(query.all(&self.db).await?)
    }

    /// Filtered, optionally ordered result set.
    ///
    /// Unless `force` bypasses it, the soft-delete filter restricts the
    /// set to records whose flag equals `selection.is_deleted` (live
    /// records by default). Plain mapping fields become equality
    /// filters; an attached condition is AND-combined.
    pub async fn select(&self, selection: Selection) -> AppResult<Vec<E::Model>> {
        Ok(self.build_select(&selection)?.all(&self.db).await?)
    }

    /// Single-record lookup with `select` filter semantics.
    ///
    /// Returns `None` on no match and an explicit
    /// [`AppError::MultipleRecords`] when the selection is ambiguous.
    /// Successful lookups are cached under the selection digest;
    /// `force_cache` requests a fresh lookup. Cache failures degrade to
    /// the database path with a warning.
    pub async fn get_item(
        &self,
        selection: Selection,
        force_cache: bool,
    ) -> AppResult<Option<E::Model>> {
        let key = self.item_cache_key(&selection);

        if !force_cache {
            if let Some(cache) = &self.cache {
                match cache.get::<E::Model>(&key).await {
                    Ok(Some(hit)) => {
                        tracing::debug!(factory = E::factory_name(), "Item cache hit");
                        return Ok(Some(hit));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            factory = E::factory_name(),
                            error = %e,
                            "Item cache read failed"
                        );
                    }
                }
            }
        }

        let mut matches = self
            .build_select(&selection)?
            .limit(2)
            .all(&self.db)
            .await?;
        if matches.len() > 1 {
            return Err(AppError::MultipleRecords);
        }
        let item = matches.pop();

        if let (Some(cache), Some(model)) = (&self.cache, &item) {
            if let Err(e) = cache.set(&key, model).await {
                tracing::warn!(
                    factory = E::factory_name(),
                    error = %e,
                    "Item cache write failed"
                );
            }
        }

        Ok(item)
    }

    /// Most recently created record matching the selection (highest id),
    /// `None` when nothing matches. Any ordering in the selection is
    /// replaced by descending id.
    pub async fn get_last(&self, mut selection: Selection) -> AppResult<Option<E::Model>> {
        selection.order_by = None;
        let query = self
            .build_select(&selection)?
            .order_by(E::id_column(), Order::Desc);
        Ok(query.one(&self.db).await?)
    }

    /// Project a result set to its id list.
    pub fn ids(items: &[E::Model]) -> Vec<i64> {
        items.iter().map(E::record_id).collect()
    }

    // =========================================================================
    // Lock Markers
    // =========================================================================

    /// Whether the record currently carries an advisory lock marker.
    /// Always `false` without a cache handle.
    pub async fn is_object_locked(&self, id: i64) -> AppResult<bool> {
        match &self.cache {
            Some(cache) => cache.is_object_locked(E::factory_name(), id).await,
            None => Ok(false),
        }
    }

    async fn set_lock_marker(&self, id: i64) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_object_lock(E::factory_name(), id).await {
                tracing::warn!(
                    factory = E::factory_name(),
                    id,
                    error = %e,
                    "Failed to set object lock marker"
                );
            }
        }
    }

    async fn clear_lock_marker(&self, id: i64) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.remove_object_lock(E::factory_name(), id).await {
                tracing::warn!(
                    factory = E::factory_name(),
                    id,
                    error = %e,
                    "Failed to remove object lock marker"
                );
            }
        }
    }

    // =========================================================================
    // Query Construction
    // =========================================================================

    fn build_select(&self, selection: &Selection) -> AppResult<Select<E>> {
        let mut condition = Condition::all();

        if !selection.force {
            condition = condition.add(E::deleted_column().eq(selection.is_deleted));
        }

        if let Some(plain) = &selection.plain {
            for (field, value) in plain.iter() {
                condition = condition.add(Self::plain_filter(field, value)?);
            }
        }

        if let Some(query) = &selection.query {
            condition = condition.add(query.clone());
        }

        let mut select = E::find().filter(condition);
        if let Some(order) = &selection.order_by {
            select = select.order_by(Self::column(&order.field)?, order.direction.into());
        }

        Ok(select)
    }

    /// Copy mapping fields onto an active model. The identifier column is
    /// never written through a mapping: ids are assigned by the database
    /// and addressed via method parameters.
    fn apply_mapping(active: &mut E::Active, data: &Mapping) -> AppResult<()> {
        for (field, value) in data.iter() {
            let column = Self::column(field)?;
            if column.as_str() == E::id_column().as_str() {
                continue;
            }

            let value = match value {
                JsonValue::Null => Self::null_value(&column).ok_or_else(|| {
                    AppError::unsupported_filter(field, "cannot write null to this column type")
                })?,
                other => Self::scalar(field, other)?,
            };
            active.set(column, value);
        }
        Ok(())
    }

    fn plain_filter(field: &str, value: &JsonValue) -> AppResult<SimpleExpr> {
        let column = Self::column(field)?;

        Ok(match value {
            JsonValue::Null => column.is_null(),
            other => column.eq(Self::scalar(field, other)?),
        })
    }

    /// Convert a JSON scalar into a bind value.
    fn scalar(field: &str, value: &JsonValue) -> AppResult<Value> {
        Ok(match value {
            JsonValue::Bool(b) => (*b).into(),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.into()
                } else if let Some(u) = n.as_u64() {
                    u.into()
                } else if let Some(f) = n.as_f64() {
                    f.into()
                } else {
                    return Err(AppError::unsupported_filter(field, "number out of range"));
                }
            }
            JsonValue::String(s) => s.as_str().into(),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => {
                return Err(AppError::unsupported_filter(
                    field,
                    "nested values are not valid scalars",
                ));
            }
        })
    }

    /// A typed null for the column, so NULL binds with the right
    /// parameter type. Exotic column types are not writable via mappings.
    fn null_value(column: &E::Column) -> Option<Value> {
        Some(match column.def().get_column_type() {
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Value::String(None),
            ColumnType::TinyInteger | ColumnType::SmallInteger | ColumnType::Integer => {
                Value::Int(None)
            }
            ColumnType::BigInteger => Value::BigInt(None),
            ColumnType::Float => Value::Float(None),
            ColumnType::Double => Value::Double(None),
            ColumnType::Boolean => Value::Bool(None),
            _ => return None,
        })
    }

    fn column(field: &str) -> AppResult<E::Column> {
        E::Column::from_str(field).map_err(|_| AppError::UnknownField(field.to_string()))
    }

    fn item_cache_key(&self, selection: &Selection) -> String {
        let name = format!(
            "{}|force={}|is_deleted={}",
            E::factory_name(),
            selection.force,
            selection.is_deleted
        );
        let digest = cache_key(
            &name,
            selection.plain.as_ref(),
            selection.query_signature().as_deref(),
        );
        format!("{}{}", CACHE_PREFIX_ITEM, digest)
    }
}
