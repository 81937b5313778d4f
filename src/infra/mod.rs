//! Infrastructure layer - External systems integration
//!
//! This module handles the external system concerns the factories sit on:
//! - Database connections (SeaORM)
//! - Cache and advisory lock markers (Redis)

pub mod cache;
pub mod db;

pub use cache::Cache;
pub use db::Database;
