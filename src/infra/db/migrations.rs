//! Schema helpers for host migrations.
//!
//! Managed records carry an `is_deleted` and an `is_locked` flag. Host
//! applications own their migration history; these helpers add or remove
//! the flag columns (and the soft-delete filter index) on any table from
//! inside a host `MigrationTrait` implementation.

use sea_orm_migration::prelude::*;

use crate::config::{DELETED_FIELD, LOCKED_FIELD};

/// Add the managed-record flag columns and the soft-delete index.
pub async fn add_record_flags(manager: &SchemaManager<'_>, table: &str) -> Result<(), DbErr> {
    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .add_column(
                    ColumnDef::new(Alias::new(DELETED_FIELD))
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .add_column(
                    ColumnDef::new(Alias::new(LOCKED_FIELD))
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .to_owned(),
        )
        .await?;

    // Index for efficient filtering of live records
    manager
        .create_index(
            Index::create()
                .name(deleted_index_name(table))
                .table(Alias::new(table))
                .col(Alias::new(DELETED_FIELD))
                .to_owned(),
        )
        .await
}

/// Reverse of [`add_record_flags`].
pub async fn drop_record_flags(manager: &SchemaManager<'_>, table: &str) -> Result<(), DbErr> {
    manager
        .drop_index(
            Index::drop()
                .name(deleted_index_name(table))
                .table(Alias::new(table))
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .drop_column(Alias::new(LOCKED_FIELD))
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .drop_column(Alias::new(DELETED_FIELD))
                .to_owned(),
        )
        .await
}

fn deleted_index_name(table: &str) -> String {
    format!("idx_{}_{}", table, DELETED_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_name_embeds_table_and_field() {
        assert_eq!(deleted_index_name("articles"), "idx_articles_is_deleted");
    }
}
