//! Application-wide state (shared between endpoint functions).

use actix_web::web::Data;
use shoppu_configuration::Configuration;
use shoppu_database::{apply_pending_migrations, establish_database_connection_pool, DatabaseSetupError};
use sqlx::{pool::PoolConnection, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;



/// Central application state.
///
/// Use [`ApplicationState`] instead as it already wraps this struct
/// in [`actix_web::web::Data`]!
///
/// If you need mutable state, opt for internal mutability as the struct
/// is internally essentially wrapped in an `Arc` by actix.
pub struct ApplicationStateInner {
    /// The configuration that this server was loaded with.
    pub configuration: Configuration,

    /// SQLite database connection pool.
    pub database_pool: SqlitePool,

    /// Token that mutating requests must carry in their `X-CSRF-Token` header.
    /// Taken from the configuration, or randomly generated on startup if unset.
    pub anti_forgery_token: String,
}

impl ApplicationStateInner {
    /// Connects to the configured database and applies any pending migrations.
    pub async fn new(configuration: Configuration) -> Result<Self, DatabaseSetupError> {
        let database_pool = establish_database_connection_pool(
            &configuration.database.url,
            configuration.database.max_connections,
        )
        .await?;

        apply_pending_migrations(&database_pool).await?;
        info!("Database connection established and migrations applied.");

        Ok(Self::with_database_pool(configuration, database_pool))
    }

    pub fn with_database_pool(configuration: Configuration, database_pool: SqlitePool) -> Self {
        let anti_forgery_token = configuration
            .http
            .anti_forgery_token
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        Self {
            configuration,
            database_pool,
            anti_forgery_token,
        }
    }

    pub async fn acquire_database_connection(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.database_pool.acquire().await
    }
}


/// Central application state, wrapped in an actix [`Data`] wrapper.
///
/// This enables usage in endpoint functions.
/// See <https://actix.rs/docs/application#state> for more information.
///
/// # Examples
/// ```no_run
/// # use actix_web::get;
/// # use shoppu::api::errors::EndpointResult;
/// # use shoppu::state::ApplicationState;
/// #[get("")]
/// pub async fn some_endpoint(
///     state: ApplicationState,
/// ) -> EndpointResult {
///     // state.database_pool, state.configuration, ...
///     # todo!();
/// }
/// ```
pub type ApplicationState = Data<ApplicationStateInner>;
