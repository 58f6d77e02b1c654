use serde::Deserialize;

use crate::traits::TryResolve;
use crate::DatabaseConfigurationError;


#[derive(Deserialize, Debug, Clone)]
pub(crate) struct UnresolvedDatabaseConfiguration {
    url: String,

    max_connections: Option<u32>,
}


/// SQLite-related configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfiguration {
    /// SQLite connection URL, e.g. `sqlite://./data/shoppu.db?mode=rwc`
    /// or `sqlite::memory:`.
    pub url: String,

    /// Maximum size of the connection pool (defaults to 10).
    pub max_connections: Option<u32>,
}


impl TryResolve for UnresolvedDatabaseConfiguration {
    type Resolved = DatabaseConfiguration;
    type Error = DatabaseConfigurationError;

    fn try_resolve(self) -> Result<Self::Resolved, Self::Error> {
        if self.url.trim().is_empty() {
            return Err(DatabaseConfigurationError::EmptyUrl);
        }

        if self.max_connections == Some(0) {
            return Err(DatabaseConfigurationError::ZeroMaxConnections);
        }

        Ok(DatabaseConfiguration {
            url: self.url,
            max_connections: self.max_connections,
        })
    }
}
