//! ScyllaDB persistence layer for the speech gateway
//!
//! Stores user feedback. The keyspace plays the role of the database name
//! from the store URI.

pub mod client;
pub mod error;
pub mod feedback;
pub mod schema;

pub use client::{ScyllaClient, ScyllaConfig, DEFAULT_KEYSPACE};
pub use error::PersistenceError;
pub use feedback::{submit_feedback, FeedbackStore, InMemoryFeedbackStore, ScyllaFeedbackStore};

/// Connect, verify the cluster answers, and make sure the schema exists
///
/// Any failure here is meant to stop the process at startup.
pub async fn init(config: ScyllaConfig) -> Result<ScyllaFeedbackStore, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ping().await?;
    client.ensure_schema().await?;

    Ok(ScyllaFeedbackStore::new(client))
}
