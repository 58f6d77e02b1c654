//! A test-only API. Compiled into the binary and enabled only when
//! the `with_test_facilities` feature flag is enabled.

use actix_web::{post, web, HttpResponse, Scope};
use sqlx::{Connection, SqliteConnection};
use tracing::warn;

use crate::{
    api::errors::{EndpointErrorContext, EndpointResult},
    state::ApplicationState,
};


/// Deletes every product and category.
pub async fn delete_all_records(database_connection: &mut SqliteConnection) -> sqlx::Result<()> {
    let mut transaction = database_connection.begin().await?;

    sqlx::query("DELETE FROM products")
        .execute(&mut *transaction)
        .await?;
    sqlx::query("DELETE FROM categories")
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await
}


#[post("/full-reset")]
pub async fn reset_server(state: ApplicationState) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot reset database: unknown error!";

    warn!("Resetting database.");

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    delete_all_records(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    Ok(HttpResponse::Ok().finish())
}


#[rustfmt::skip]
pub fn testing_router() -> Scope {
    web::scope("/testing")
        .service(reset_server)
}
