//! Assembly of the actix HTTP server (shared by the binary and the end-to-end tests).

use std::net::TcpListener;

use actix_web::{dev::Server, middleware::NormalizePath, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{
    api::{api_router, json_extractor_configuration, openapi, query_extractor_configuration},
    index::index_page,
    state::ApplicationState,
};


/// Builds the HTTP server on an already bound `listener`.
///
/// The returned [`Server`] does nothing until awaited (or spawned).
/// If `worker_count` is `None`, actix picks the number of workers
/// based on the available CPU cores.
pub fn build_http_server(
    state: ApplicationState,
    listener: TcpListener,
    worker_count: Option<usize>,
) -> std::io::Result<Server> {
    #[rustfmt::skip]
    #[allow(clippy::let_and_return)]
    let mut http_server = HttpServer::new(move || {
        // FIXME Modify permissive CORS to something more safe in production.
        let cors = actix_cors::Cors::permissive().expose_headers(vec![
            "Date",
            "Content-Type",
            "Content-Length",
        ]);

        let app = App::new()
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(json_extractor_configuration())
            .app_data(query_extractor_configuration())
            .app_data(state.clone())
            .service(index_page)
            .service(openapi::api_documentation)
            .service(api_router());

        #[cfg(feature = "with_test_facilities")]
        let app = app.service(crate::testing::testing_router());

        app
    });

    if let Some(worker_count) = worker_count {
        http_server = http_server.workers(worker_count);
    }

    Ok(http_server.listen(listener)?.run())
}
