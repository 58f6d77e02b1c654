//! API definitions and annotations for Shoppu.
//!
//! # Development note
//! We use "" instead of "/" in many places (e.g. `#[get("")`, etc.)
//! because this allows the user to request e.g. `GET /api/categories` OR `GET /api/categories/`
//! and get the correct endpoint both times.
//!
//! For more information, see `actix_web::middleware::NormalizePath` (trim mode).

use std::str::FromStr;

use actix_web::{
    web::{self, JsonConfig, QueryConfig},
    Scope,
};
use serde::Deserialize;
use shoppu_core::id::ShoppuUuidNewtype;
use shoppu_database::{ListOptions, Pagination};
use utoipa::IntoParams;

use self::errors::EndpointError;

pub mod anti_forgery;
pub mod categories;
pub mod errors;
pub mod openapi;
pub mod products;
pub mod traits;



/// Query parameters accepted by the `index` endpoints.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndexParameters {
    /// Only return records whose name contains this search term.
    pub query: Option<String>,

    /// Maximum number of results to return. Ignored unless `page` is also present.
    pub per_page: Option<u32>,

    /// 1-based results page. Ignored unless `per_page` is also present.
    pub page: Option<u32>,
}

impl IndexParameters {
    pub fn into_list_options(self) -> ListOptions {
        let mut list_options = ListOptions::new();

        if let Some(query) = self.query.filter(|query| !query.is_empty()) {
            list_options = list_options.with_name_query(query);
        }

        if let (Some(per_page), Some(page)) = (self.per_page, self.page) {
            list_options = list_options.with_pagination(Pagination::from_page(per_page, page));
        }

        list_options
    }
}



pub fn parse_uuid<U>(string: impl AsRef<str>) -> Result<U, EndpointError>
where
    U: ShoppuUuidNewtype + FromStr<Err = uuid::Error>,
{
    U::from_str(string.as_ref()).map_err(|error| {
        EndpointError::invalid_request(format!("Invalid record ID: {error}."))
    })
}



/// JSON body extractor configuration: any body that fails to parse
/// (malformed JSON, unknown fields, wrong content type, ...) results in a
/// `400 Bad Request` with a notification body.
pub fn json_extractor_configuration() -> JsonConfig {
    JsonConfig::default().error_handler(|error, _| {
        EndpointError::invalid_request(format!("Invalid JSON body: {error}.")).into()
    })
}

/// Query string extractor configuration, see [`json_extractor_configuration`].
pub fn query_extractor_configuration() -> QueryConfig {
    QueryConfig::default().error_handler(|error, _| {
        EndpointError::invalid_request(format!("Invalid query parameters: {error}.")).into()
    })
}



/// Router for the entire public API.
///
/// Lives under the `/api` path.
#[rustfmt::skip]
pub fn api_router() -> Scope {
    web::scope("/api")
        .service(categories::categories_router())
        .service(products::products_router())
}
