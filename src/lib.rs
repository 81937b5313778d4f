//! datafactory - Generic record factories over SeaORM
//!
//! This crate provides a thin data-access and admin-integration layer on
//! top of SeaORM: a generic [`Factory`] for CRUD operations on managed
//! records, an explicit [`FactoryRegistry`] giving every consumer the same
//! shared factory instance per entity, an admin controller computing
//! per-view field visibility, and a read-only record binding.
//!
//! # Architecture Layers
//!
//! - **config**: Application configuration and constants
//! - **types**: Shared input types (mappings, selections, ordering)
//! - **factory**: The factory core, cache keys, and the registry
//! - **admin**: Admin-view integration (field plans, delegation)
//! - **signals**: Record lifecycle notifications
//! - **bound**: Read-only record binding
//! - **infra**: Infrastructure concerns (database, cache)
//! - **errors**: Centralized error handling
//!
//! # Usage
//!
//! ```ignore
//! let db = Database::connect(&config).await;
//! let cache = Cache::connect(&config).await;
//! let hub = Arc::new(SignalHub::new());
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register(Arc::new(
//!     Factory::<article::Entity>::new(db.get_connection(), hub.clone())
//!         .with_cache(cache.clone()),
//! ))?;
//! let registry = Arc::new(registry);
//!
//! let articles = registry.get::<article::Entity>()?;
//! let item = articles.create(Mapping::new().set("title", "hello")).await?;
//! ```

pub mod admin;
pub mod bound;
pub mod config;
pub mod errors;
pub mod factory;
pub mod infra;
pub mod signals;
pub mod types;

// Re-export commonly used types at crate root
pub use admin::{AdminView, FormFields, ModelAdmin};
pub use bound::Bound;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use factory::{Factory, FactoryRegistry, ManagedEntity};
pub use infra::{Cache, Database};
pub use signals::{RecordEvent, RecordObserver, SignalHub};
pub use types::{Direction, Mapping, OrderBy, Selection};

// Export observer mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use signals::MockRecordObserver;
