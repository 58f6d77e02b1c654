//! OpenAPI documentation of the `/api` scope, generated from the
//! `#[utoipa::path]` annotations on the endpoint functions.

use actix_web::get;
use shoppu_core::api_models::{
    Category,
    CategoryCreationFields,
    CategoryCreationRequest,
    CategoryUpdateFields,
    CategoryUpdateRequest,
    CountResponse,
    Notification,
    NotificationLevel,
    NotificationResponse,
    Product,
    ProductCreationFields,
    ProductCreationRequest,
    ProductUpdateFields,
    ProductUpdateRequest,
    SelectOption,
};
use utoipa::OpenApi;

use super::{
    categories,
    errors::{EndpointResponseBuilder, EndpointResult},
    products,
};


#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shoppu",
        description = "Catalog administration API: categories (a tree) and their products."
    ),
    paths(
        categories::get_category_count,
        categories::get_all_categories,
        categories::get_category_options,
        categories::get_specific_category,
        categories::create_category,
        categories::update_specific_category,
        categories::delete_specific_category,

        products::get_product_count,
        products::get_all_products,
        products::get_product_options,
        products::get_specific_product,
        products::create_product,
        products::update_specific_product,
        products::delete_specific_product,
    ),
    components(
        schemas(
            Category,
            CategoryCreationFields,
            CategoryCreationRequest,
            CategoryUpdateFields,
            CategoryUpdateRequest,
            Product,
            ProductCreationFields,
            ProductCreationRequest,
            ProductUpdateFields,
            ProductUpdateRequest,
            CountResponse,
            SelectOption,
            Notification,
            NotificationLevel,
            NotificationResponse,
        )
    ),
    tags(
        (name = "category", description = "Category operations"),
        (name = "product", description = "Product operations"),
    )
)]
pub struct ApiDocumentation;


/// Serves the OpenAPI document as JSON.
#[get("/apidocs")]
pub async fn api_documentation() -> EndpointResult {
    EndpointResponseBuilder::ok()
        .with_json_body(ApiDocumentation::openapi())
        .build()
}
