//! Record lifecycle notifications.
//!
//! A [`SignalHub`] holds the observers registered at startup and triggers
//! them once per factory operation. Notifications fire after the write
//! has committed, so an observer error cannot roll anything back; it is
//! logged and dispatch continues with the remaining observers.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Error an observer may surface; dispatch logs it and moves on.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct SignalError(pub String);

impl SignalError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// A lifecycle notification emitted by a factory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEvent {
    Created { factory: &'static str, id: i64 },
    Updated { factory: &'static str, id: i64 },
    Deleted { factory: &'static str, id: i64 },
}

impl RecordEvent {
    pub fn factory(&self) -> &'static str {
        match self {
            RecordEvent::Created { factory, .. }
            | RecordEvent::Updated { factory, .. }
            | RecordEvent::Deleted { factory, .. } => factory,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            RecordEvent::Created { id, .. }
            | RecordEvent::Updated { id, .. }
            | RecordEvent::Deleted { id, .. } => *id,
        }
    }
}

/// Hooks for record lifecycle notifications. All hooks default to no-ops;
/// implement only the ones a listener cares about.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecordObserver: Send + Sync {
    async fn created(&self, _factory: &'static str, _id: i64) -> Result<(), SignalError> {
        Ok(())
    }

    async fn updated(&self, _factory: &'static str, _id: i64) -> Result<(), SignalError> {
        Ok(())
    }

    async fn deleted(&self, _factory: &'static str, _id: i64) -> Result<(), SignalError> {
        Ok(())
    }
}

/// Observer list constructed once at startup and shared by reference.
pub struct SignalHub {
    observers: Vec<Arc<dyn RecordObserver>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer. Registration happens before the hub is
    /// shared; dispatch order is registration order.
    pub fn register(&mut self, observer: Arc<dyn RecordObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Trigger every observer for `event`.
    pub async fn notify(&self, event: RecordEvent) {
        tracing::debug!(
            factory = event.factory(),
            id = event.id(),
            "record notification"
        );

        for observer in &self.observers {
            let outcome = match event {
                RecordEvent::Created { factory, id } => observer.created(factory, id).await,
                RecordEvent::Updated { factory, id } => observer.updated(factory, id).await,
                RecordEvent::Deleted { factory, id } => observer.deleted(factory, id).await,
            };

            if let Err(e) = outcome {
                tracing::error!(
                    factory = event.factory(),
                    id = event.id(),
                    error = %e,
                    "Observer failed"
                );
            }
        }
    }
}

impl Default for SignalHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordObserver for RecordingObserver {
        async fn created(&self, factory: &'static str, id: i64) -> Result<(), SignalError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("created:{}:{}", factory, id));
            Ok(())
        }

        async fn deleted(&self, factory: &'static str, id: i64) -> Result<(), SignalError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("deleted:{}:{}", factory, id));
            Ok(())
        }
    }

    /// Observer that always fails, for degradation tests.
    struct FailingObserver;

    #[async_trait]
    impl RecordObserver for FailingObserver {
        async fn created(&self, _factory: &'static str, _id: i64) -> Result<(), SignalError> {
            Err(SignalError::new("listener unavailable"))
        }
    }

    #[tokio::test]
    async fn notify_reaches_every_observer_once() {
        let first = Arc::new(RecordingObserver::default());
        let second = Arc::new(RecordingObserver::default());

        let mut hub = SignalHub::new();
        hub.register(first.clone());
        hub.register(second.clone());
        assert_eq!(hub.observer_count(), 2);

        hub.notify(RecordEvent::Created {
            factory: "articles",
            id: 7,
        })
        .await;

        assert_eq!(first.events(), vec!["created:articles:7"]);
        assert_eq!(second.events(), vec!["created:articles:7"]);
    }

    #[tokio::test]
    async fn default_hooks_ignore_unhandled_events() {
        let observer = Arc::new(RecordingObserver::default());
        let mut hub = SignalHub::new();
        hub.register(observer.clone());

        // RecordingObserver has no `updated` hook
        hub.notify(RecordEvent::Updated {
            factory: "articles",
            id: 7,
        })
        .await;

        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn observer_failure_does_not_stop_dispatch() {
        let recording = Arc::new(RecordingObserver::default());
        let mut hub = SignalHub::new();
        hub.register(Arc::new(FailingObserver));
        hub.register(recording.clone());

        hub.notify(RecordEvent::Created {
            factory: "articles",
            id: 1,
        })
        .await;

        assert_eq!(recording.events(), vec!["created:articles:1"]);
    }

    #[tokio::test]
    async fn mock_observer_expectations() {
        let mut observer = MockRecordObserver::new();
        observer
            .expect_deleted()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut hub = SignalHub::new();
        hub.register(Arc::new(observer));

        hub.notify(RecordEvent::Deleted {
            factory: "articles",
            id: 3,
        })
        .await;
    }
}
