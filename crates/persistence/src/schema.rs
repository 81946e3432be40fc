//! ScyllaDB schema creation

use crate::error::PersistenceError;
use scylla::Session;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // created_at is epoch millis, NULL when the record carries none
    let feedback_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.feedback (
            id UUID,
            name TEXT,
            email TEXT,
            rating INT,
            message TEXT,
            created_at BIGINT,
            PRIMARY KEY (id)
        )
    "#,
        keyspace
    );

    session
        .query_unpaged(feedback_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create feedback table: {}", e))
        })?;

    tracing::info!("All tables created successfully");
    Ok(())
}
