//! ScyllaDB client and connection management

use crate::error::PersistenceError;
use crate::schema;
use audiogen_config::PersistenceConfig;
use scylla::{Session, SessionBuilder};
use std::sync::Arc;

const URI_SCHEME: &str = "scylla://";
const DEFAULT_PORT: u16 = 9042;

/// Keyspace used when the URI names none
pub const DEFAULT_KEYSPACE: &str = "test";

/// ScyllaDB configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScyllaConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u8,
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            hosts: vec![format!("127.0.0.1:{}", DEFAULT_PORT)],
            keyspace: DEFAULT_KEYSPACE.to_string(),
            replication_factor: 1,
        }
    }
}

impl ScyllaConfig {
    /// Parse `scylla://host[:port][,host[:port]...][/keyspace]`
    ///
    /// Hosts without a port get 9042. The keyspace doubles as the database
    /// name and must be a valid CQL identifier.
    pub fn from_uri(uri: &str, replication_factor: u8) -> Result<Self, PersistenceError> {
        let rest = uri
            .trim()
            .strip_prefix(URI_SCHEME)
            .ok_or_else(|| PersistenceError::InvalidUri(format!("expected {}...", URI_SCHEME)))?;

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, path),
            None => (rest, ""),
        };

        let hosts: Vec<String> = authority
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| {
                if h.contains(':') {
                    h.to_string()
                } else {
                    format!("{}:{}", h, DEFAULT_PORT)
                }
            })
            .collect();
        if hosts.is_empty() {
            return Err(PersistenceError::InvalidUri("no hosts given".to_string()));
        }

        // Query strings are accepted and ignored
        let keyspace = path.split('?').next().unwrap_or_default().trim_matches('/');
        let keyspace = if keyspace.is_empty() {
            DEFAULT_KEYSPACE.to_string()
        } else {
            keyspace.to_string()
        };
        if !is_valid_identifier(&keyspace) {
            return Err(PersistenceError::InvalidUri(format!(
                "invalid keyspace '{}'",
                keyspace
            )));
        }

        Ok(Self {
            hosts,
            keyspace,
            replication_factor,
        })
    }
}

impl TryFrom<&PersistenceConfig> for ScyllaConfig {
    type Error = PersistenceError;

    fn try_from(config: &PersistenceConfig) -> Result<Self, Self::Error> {
        Self::from_uri(&config.uri, config.replication_factor)
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 48
}

/// ScyllaDB client wrapper
#[derive(Clone)]
pub struct ScyllaClient {
    session: Arc<Session>,
    config: ScyllaConfig,
}

impl ScyllaClient {
    /// Connect to ScyllaDB cluster
    pub async fn connect(config: ScyllaConfig) -> Result<Self, PersistenceError> {
        tracing::info!(hosts = ?config.hosts, keyspace = %config.keyspace, "Connecting to ScyllaDB");

        let session = SessionBuilder::new()
            .known_nodes(&config.hosts)
            .build()
            .await?;

        Ok(Self {
            session: Arc::new(session),
            config,
        })
    }

    /// Round-trip a trivial query to prove the cluster answers
    pub async fn ping(&self) -> Result<(), PersistenceError> {
        self.session
            .query_unpaged("SELECT release_version FROM system.local", &[])
            .await?;
        Ok(())
    }

    /// Ensure keyspace and tables exist
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        schema::create_keyspace(
            &self.session,
            &self.config.keyspace,
            self.config.replication_factor,
        )
        .await?;
        schema::create_tables(&self.session, &self.config.keyspace).await?;
        tracing::info!(keyspace = %self.config.keyspace, "Schema ensured");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn keyspace(&self) -> &str {
        &self.config.keyspace
    }
}
