//! Persistence layer of Shoppu: SQLite connection setup, embedded migrations
//! and per-entity query/mutation helpers (see [`entities`]).

use std::{borrow::Cow, str::FromStr, time::Duration};

use sqlx::{
    migrate::{MigrateError, Migrator},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use thiserror::Error;

pub mod entities;
mod shared;

pub use shared::*;


/// Migrations embedded from `./migrations` at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");


const DEFAULT_MAX_CONNECTIONS: u32 = 10;


#[derive(Debug, Error)]
pub enum QueryError {
    #[error("sqlx error")]
    SqlxError {
        #[from]
        #[source]
        error: sqlx::Error,
    },

    #[error("model error: {}", .reason)]
    ModelError { reason: Cow<'static, str> },

    #[error("database inconsistency: {}", .problem)]
    DatabaseInconsistencyError { problem: Cow<'static, str> },
}

impl QueryError {
    pub fn model_error<R>(reason: R) -> Self
    where
        R: Into<Cow<'static, str>>,
    {
        Self::ModelError {
            reason: reason.into(),
        }
    }

    pub fn database_inconsistency<R>(problem: R) -> Self
    where
        R: Into<Cow<'static, str>>,
    {
        Self::DatabaseInconsistencyError {
            problem: problem.into(),
        }
    }

    /// Returns `true` if the query was rejected by a `UNIQUE` constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::SqlxError { error } => error
                .as_database_error()
                .map(|database_error| database_error.is_unique_violation())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Returns `true` for failures that may succeed if the request is retried
    /// (pool exhaustion, I/O errors, a busy or locked database file).
    pub fn is_transient(&self) -> bool {
        let Self::SqlxError { error } = self else {
            return false;
        };

        match error {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => true,
            sqlx::Error::Database(database_error) => matches!(
                database_error.code().as_deref(),
                // SQLITE_BUSY, SQLITE_LOCKED and their extended variants.
                Some("5" | "6" | "261" | "262" | "517")
            ),
            _ => false,
        }
    }
}



pub type QueryResult<R, E = QueryError> = Result<R, E>;



pub trait IntoExternalModel {
    type ExternalModel;

    fn into_external_model(self) -> Self::ExternalModel;
}

pub trait TryIntoExternalModel {
    type ExternalModel;
    type Error;

    fn try_into_external_model(self) -> Result<Self::ExternalModel, Self::Error>;
}



#[derive(Debug, Error)]
pub enum DatabaseSetupError {
    #[error("invalid database URL")]
    InvalidUrl {
        #[source]
        error: sqlx::Error,
    },

    #[error("unable to connect to database")]
    UnableToConnect {
        #[source]
        error: sqlx::Error,
    },

    #[error("failed to apply database migrations")]
    MigrationError {
        #[from]
        #[source]
        error: MigrateError,
    },
}


/// Opens a connection pool to the SQLite database at `database_url`.
///
/// Foreign keys are always enforced. In-memory databases (`sqlite::memory:`)
/// are limited to a single, never-recycled connection, since every
/// new connection would otherwise see its own empty database.
pub async fn establish_database_connection_pool(
    database_url: &str,
    max_connections: Option<u32>,
) -> Result<SqlitePool, DatabaseSetupError> {
    let connection_options = SqliteConnectOptions::from_str(database_url)
        .map_err(|error| DatabaseSetupError::InvalidUrl { error })?
        .foreign_keys(true)
        .create_if_missing(true);

    let is_in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let pool_options = if is_in_memory {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .idle_timeout(Some(Duration::from_secs(60 * 20)))
            .max_lifetime(Some(Duration::from_secs(60 * 60)))
            .min_connections(1)
            .max_connections(max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
    };

    pool_options
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connection_options)
        .await
        .map_err(|error| DatabaseSetupError::UnableToConnect { error })
}


/// Applies any pending migrations from [`MIGRATOR`].
pub async fn apply_pending_migrations(database_pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    MIGRATOR.run(database_pool).await?;

    Ok(())
}


/// Opens a fresh, fully migrated in-memory database.
pub async fn establish_in_memory_database() -> Result<SqlitePool, DatabaseSetupError> {
    let database_pool = establish_database_connection_pool("sqlite::memory:", None).await?;
    apply_pending_migrations(&database_pool).await?;

    Ok(database_pool)
}
