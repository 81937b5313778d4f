//! Shared test fixtures: a managed entity and a recording observer.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use datafactory::signals::SignalError;
use datafactory::RecordObserver;

pub mod article {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    use datafactory::ManagedEntity;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "articles")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub title: String,
        pub body: String,
        pub is_deleted: bool,
        pub is_locked: bool,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl ManagedEntity for Entity {
        type Active = ActiveModel;

        fn factory_name() -> &'static str {
            "articles"
        }

        fn id_column() -> Self::Column {
            Column::Id
        }

        fn deleted_column() -> Self::Column {
            Column::IsDeleted
        }

        fn locked_column() -> Self::Column {
            Column::IsLocked
        }

        fn record_id(model: &Model) -> i64 {
            model.id
        }
    }
}

/// Build an article row for mock query results.
pub fn article_model(id: i64, title: &str, is_deleted: bool) -> article::Model {
    let now = Utc::now();
    article::Model {
        id,
        title: title.to_string(),
        body: format!("body of {}", title),
        is_deleted,
        is_locked: false,
        created_at: now,
        updated_at: now,
    }
}

/// Observer that records every notification it receives.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, kind: &str, factory: &str, id: i64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", kind, factory, id));
    }
}

#[async_trait]
impl RecordObserver for RecordingObserver {
    async fn created(&self, factory: &'static str, id: i64) -> Result<(), SignalError> {
        self.push("created", factory, id);
        Ok(())
    }

    async fn updated(&self, factory: &'static str, id: i64) -> Result<(), SignalError> {
        self.push("updated", factory, id);
        Ok(())
    }

    async fn deleted(&self, factory: &'static str, id: i64) -> Result<(), SignalError> {
        self.push("deleted", factory, id);
        Ok(())
    }
}
