//! Feedback persistence using ScyllaDB

use crate::{PersistenceError, ScyllaClient};
use async_trait::async_trait;
use audiogen_core::{FeedbackRecord, FeedbackSubmission, StoredFeedback};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Feedback store trait
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist an accepted record and return it with its new identifier
    async fn insert(&self, record: FeedbackRecord) -> Result<StoredFeedback, PersistenceError>;

    /// All records, in store order
    async fn list(&self) -> Result<Vec<StoredFeedback>, PersistenceError>;

    /// Cheap liveness check against the backing store
    async fn ping(&self) -> Result<(), PersistenceError>;
}

/// Validate a submission and persist it
///
/// Validation failures come back as `Error::Validation` before the store is
/// touched; store failures come back as `Error::Internal`.
pub async fn submit_feedback(
    store: &dyn FeedbackStore,
    submission: FeedbackSubmission,
) -> audiogen_core::Result<StoredFeedback> {
    let record = submission.validate()?;
    let stored = store.insert(record).await?;
    Ok(stored)
}

/// ScyllaDB implementation of the feedback store
#[derive(Clone)]
pub struct ScyllaFeedbackStore {
    client: ScyllaClient,
}

impl ScyllaFeedbackStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    fn row_to_feedback(
        &self,
        row: scylla::frame::response::result::Row,
    ) -> Result<StoredFeedback, PersistenceError> {
        let (id, name, email, rating, message, created_at): (
            Uuid,
            Option<String>,
            Option<String>,
            Option<i32>,
            Option<String>,
            Option<i64>,
        ) = row
            .into_typed()
            .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

        let created_at = match created_at {
            Some(millis) => Some(DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(
                || PersistenceError::InvalidData(format!("created_at out of range: {}", millis)),
            )?),
            None => None,
        };

        Ok(StoredFeedback {
            id,
            record: FeedbackRecord {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                rating: rating.unwrap_or_default(),
                message: message.unwrap_or_default(),
                created_at,
            },
        })
    }
}

#[async_trait]
impl FeedbackStore for ScyllaFeedbackStore {
    async fn insert(&self, record: FeedbackRecord) -> Result<StoredFeedback, PersistenceError> {
        let stored = StoredFeedback::new(record);
        let query = format!(
            "INSERT INTO {}.feedback (id, name, email, rating, message, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    stored.id,
                    &stored.record.name,
                    &stored.record.email,
                    stored.record.rating,
                    &stored.record.message,
                    stored.record.created_at.map(|t| t.timestamp_millis()),
                ),
            )
            .await?;

        tracing::info!(
            feedback_id = %stored.id,
            rating = stored.record.rating,
            "Feedback stored in ScyllaDB"
        );

        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<StoredFeedback>, PersistenceError> {
        let query = format!(
            "SELECT id, name, email, rating, message, created_at FROM {}.feedback",
            self.client.keyspace()
        );

        let result = self.client.session().query_unpaged(query, &[]).await?;

        let mut feedback = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                feedback.push(self.row_to_feedback(row)?);
            }
        }

        tracing::debug!(count = feedback.len(), "Listed feedback");
        Ok(feedback)
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        self.client.ping().await
    }
}

/// Process-local store used when persistence is disabled
#[derive(Default)]
pub struct InMemoryFeedbackStore {
    records: RwLock<Vec<StoredFeedback>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn insert(&self, record: FeedbackRecord) -> Result<StoredFeedback, PersistenceError> {
        let stored = StoredFeedback::new(record);
        self.records.write().await.push(stored.clone());
        tracing::debug!(feedback_id = %stored.id, "Feedback stored in memory");
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<StoredFeedback>, PersistenceError> {
        Ok(self.records.read().await.clone())
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
