use actix_web::{delete, get, post, route, web};
use shoppu_core::{
    api_models::{
        CountResponse,
        ProductCreationRequest,
        ProductUpdateRequest,
    },
    currency::DEFAULT_CURRENCY,
    id::{CategoryId, ProductId},
    validation::{validate_currency_code, validate_name, validate_price, ValidationError},
};
use shoppu_database::entities::{
    CategoryQuery,
    NewProduct,
    ProductMutation,
    ProductQuery,
    ProductValuesToUpdate,
};
use sqlx::{Connection, SqliteConnection};
use tracing::info;

use crate::{
    api::{
        anti_forgery::VerifiedAntiForgeryToken,
        errors::{EndpointError, EndpointErrorContext, EndpointResponseBuilder, EndpointResult},
        parse_uuid,
        traits::IntoApiModel,
        IndexParameters,
    },
    state::ApplicationState,
};


const CURRENCY_FIELD_NAME: &str = "currency";
const DISPLAY_CURRENCY_FIELD_NAME: &str = "display currency";



async fn ensure_category_exists(
    database_connection: &mut SqliteConnection,
    category_id: Option<CategoryId>,
) -> Result<Result<CategoryId, ValidationError>, EndpointError> {
    let Some(category_id) = category_id else {
        return Ok(Err(ValidationError::CategoryNotFound));
    };

    let category_exists = CategoryQuery::exists_by_id(database_connection, category_id).await?;

    if !category_exists {
        return Ok(Err(ValidationError::CategoryNotFound));
    }

    Ok(Ok(category_id))
}



/// Count products
///
/// Returns the total number of products.
#[utoipa::path(
    get,
    path = "/api/products/count",
    tag = "product",
    responses(
        (status = 200, description = "Number of products.", body = CountResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("/count")]
pub async fn get_product_count(state: ApplicationState) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot count products: unknown error!";

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let count = ProductQuery::count(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    EndpointResponseBuilder::ok()
        .with_json_body(CountResponse { count })
        .build()
}



/// List products
///
/// Returns products ordered by name, optionally filtered
/// by a name search term and paginated.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "product",
    params(IndexParameters),
    responses(
        (status = 200, description = "The product list.", body = [shoppu_core::api_models::Product]),
        (status = 400, description = "Invalid query parameters.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("")]
pub async fn get_all_products(
    state: ApplicationState,
    parameters: web::Query<IndexParameters>,
) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot list products: unknown error!";

    let list_options = parameters.into_inner().into_list_options();

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let products = ProductQuery::get_all(&mut database_connection, &list_options)
        .await
        .with_failure_message(FAILURE_MESSAGE)?
        .into_iter()
        .map(IntoApiModel::into_api_model)
        .collect::<Vec<_>>();

    EndpointResponseBuilder::ok()
        .with_json_body(products)
        .build()
}



/// Product options
///
/// Returns all products as `{value, text}` pairs ordered by name,
/// for use with HTML select fields.
#[utoipa::path(
    get,
    path = "/api/products/options",
    tag = "product",
    responses(
        (status = 200, description = "The product options.", body = [shoppu_core::api_models::SelectOption]),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("/options")]
pub async fn get_product_options(state: ApplicationState) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot fetch products: unknown error!";

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let options = ProductQuery::get_all_options(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?
        .into_iter()
        .map(IntoApiModel::into_api_model)
        .collect::<Vec<_>>();

    EndpointResponseBuilder::ok()
        .with_json_body(options)
        .build()
}



/// Get product
///
/// Returns a single product.
#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    tag = "product",
    params(
        ("product_id" = String, Path, format = Uuid, description = "ID of the product.")
    ),
    responses(
        (status = 200, description = "Product information.", body = shoppu_core::api_models::Product),
        (status = 400, description = "Invalid product ID.", body = shoppu_core::api_models::NotificationResponse),
        (status = 404, description = "Product does not exist.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("/{product_id}")]
pub async fn get_specific_product(
    state: ApplicationState,
    parameters: web::Path<(String,)>,
) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot show product: unknown error!";

    let target_product_id = parse_uuid::<ProductId>(parameters.into_inner().0)?;

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let product = ProductQuery::get_by_id(&mut database_connection, target_product_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let Some(product) = product else {
        return Err(EndpointError::not_found(
            "Cannot show product: record not found!",
        ));
    };

    EndpointResponseBuilder::ok()
        .with_json_body(product.into_api_model())
        .build()
}



/// Create a new product
///
/// Validates and stores a new product. The name and an existing category
/// are required. The price is optional but must not be negative, and
/// both currencies default to `EUR`.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "product",
    request_body(content = ProductCreationRequest),
    params(
        ("X-CSRF-Token" = String, Header, description = "Anti-forgery token from the index page.")
    ),
    responses(
        (status = 200, description = "The newly created product.", body = shoppu_core::api_models::Product),
        (status = 400, description = "Malformed request body.", body = shoppu_core::api_models::NotificationResponse),
        (status = 406, description = "The product failed validation.", body = shoppu_core::api_models::NotificationResponse),
        (status = 422, description = "Missing or invalid anti-forgery token.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[post("")]
pub async fn create_product(
    state: ApplicationState,
    _anti_forgery_token: VerifiedAntiForgeryToken,
    request_body: web::Json<ProductCreationRequest>,
) -> EndpointResult {
    const VALIDATION_FAILURE_PREFIX: &str = "Cannot create product";
    const FAILURE_MESSAGE: &str = "Cannot create product: unknown error!";

    let fields = request_body.into_inner().product;
    let validation_failed =
        |reason| EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason);


    let new_name = validate_name(fields.name.as_deref())
        .map_err(validation_failed)?
        .to_string();

    let new_price = validate_price(fields.price).map_err(validation_failed)?;

    let new_currency = validate_currency_code(
        CURRENCY_FIELD_NAME,
        fields.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
    )
    .map_err(validation_failed)?
    .to_string();

    let new_display_currency = validate_currency_code(
        DISPLAY_CURRENCY_FIELD_NAME,
        fields.display_currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
    )
    .map_err(validation_failed)?
    .to_string();


    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let mut transaction = database_connection
        .begin()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let category_id = ensure_category_exists(&mut transaction, fields.category_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?
        .map_err(validation_failed)?;


    let newly_created_product = ProductMutation::create(
        &mut transaction,
        NewProduct {
            category_id,
            name: new_name,
            price: new_price,
            currency: new_currency,
            display_currency: new_display_currency,
        },
    )
    .await
    .with_failure_message(FAILURE_MESSAGE)?;

    transaction
        .commit()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    info!(
        product_id = %newly_created_product.id,
        category_id = %newly_created_product.category_id,
        "Product created."
    );

    EndpointResponseBuilder::ok()
        .with_json_body(newly_created_product.into_api_model())
        .build()
}



/// Update product
///
/// Applies the provided fields to an existing product (both `PUT` and `PATCH`
/// are accepted). Moving a product to another category updates both categories'
/// product counters.
#[utoipa::path(
    put,
    path = "/api/products/{product_id}",
    tag = "product",
    params(
        ("product_id" = String, Path, format = Uuid, description = "ID of the product to update."),
        ("X-CSRF-Token" = String, Header, description = "Anti-forgery token from the index page.")
    ),
    request_body(content = ProductUpdateRequest),
    responses(
        (status = 200, description = "Updated product information.", body = shoppu_core::api_models::Product),
        (status = 400, description = "Malformed request body or product ID.", body = shoppu_core::api_models::NotificationResponse),
        (status = 404, description = "Product does not exist.", body = shoppu_core::api_models::NotificationResponse),
        (status = 406, description = "The product failed validation.", body = shoppu_core::api_models::NotificationResponse),
        (status = 422, description = "Missing or invalid anti-forgery token.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[route("/{product_id}", method = "PUT", method = "PATCH")]
pub async fn update_specific_product(
    state: ApplicationState,
    _anti_forgery_token: VerifiedAntiForgeryToken,
    parameters: web::Path<(String,)>,
    request_body: web::Json<ProductUpdateRequest>,
) -> EndpointResult {
    const VALIDATION_FAILURE_PREFIX: &str = "Cannot update product";
    const FAILURE_MESSAGE: &str = "Cannot update product: unknown error!";

    let target_product_id = parse_uuid::<ProductId>(parameters.into_inner().0)?;
    let fields = request_body.into_inner().product;
    let validation_failed =
        |reason| EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason);


    if let Some(new_name) = fields.name.as_deref() {
        validate_name(Some(new_name)).map_err(validation_failed)?;
    }

    if let Some(new_price) = fields.price {
        validate_price(Some(new_price)).map_err(validation_failed)?;
    }

    if let Some(new_currency) = fields.currency.as_deref() {
        validate_currency_code(CURRENCY_FIELD_NAME, new_currency).map_err(validation_failed)?;
    }

    if let Some(new_display_currency) = fields.display_currency.as_deref() {
        validate_currency_code(DISPLAY_CURRENCY_FIELD_NAME, new_display_currency)
            .map_err(validation_failed)?;
    }


    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let mut transaction = database_connection
        .begin()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let target_product_exists = ProductQuery::exists_by_id(&mut transaction, target_product_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    if !target_product_exists {
        return Err(EndpointError::not_found(
            "Cannot update product: record not found!",
        ));
    }

    if fields.category_id.is_some() {
        ensure_category_exists(&mut transaction, fields.category_id)
            .await
            .with_failure_message(FAILURE_MESSAGE)?
            .map_err(validation_failed)?;
    }


    let successfully_updated = ProductMutation::update(
        &mut transaction,
        target_product_id,
        ProductValuesToUpdate {
            category_id: fields.category_id,
            name: fields.name,
            price: fields.price,
            currency: fields.currency,
            display_currency: fields.display_currency,
        },
    )
    .await
    .with_failure_message(FAILURE_MESSAGE)?;

    if !successfully_updated {
        return Err(EndpointError::invalid_database_state(
            "failed to update a product that existed \
             in a previous call inside the same transaction",
        )
        .with_failure_message(FAILURE_MESSAGE));
    }


    let target_product_after_update = ProductQuery::get_by_id(&mut transaction, target_product_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let Some(target_product_after_update) = target_product_after_update else {
        return Err(EndpointError::invalid_database_state(
            "failed to fetch a product that was just updated \
             in a previous call inside the same transaction",
        )
        .with_failure_message(FAILURE_MESSAGE));
    };

    transaction
        .commit()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    EndpointResponseBuilder::ok()
        .with_json_body(target_product_after_update.into_api_model())
        .build()
}



/// Delete product
///
/// Deletes a product and responds with its last representation.
#[utoipa::path(
    delete,
    path = "/api/products/{product_id}",
    tag = "product",
    params(
        ("product_id" = String, Path, format = Uuid, description = "ID of the product to delete."),
        ("X-CSRF-Token" = String, Header, description = "Anti-forgery token from the index page.")
    ),
    responses(
        (status = 200, description = "The deleted product.", body = shoppu_core::api_models::Product),
        (status = 400, description = "Invalid product ID.", body = shoppu_core::api_models::NotificationResponse),
        (status = 404, description = "Product does not exist.", body = shoppu_core::api_models::NotificationResponse),
        (status = 422, description = "Missing or invalid anti-forgery token.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[delete("/{product_id}")]
pub async fn delete_specific_product(
    state: ApplicationState,
    _anti_forgery_token: VerifiedAntiForgeryToken,
    parameters: web::Path<(String,)>,
) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot destroy product: unknown error!";

    let target_product_id = parse_uuid::<ProductId>(parameters.into_inner().0)?;


    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let mut transaction = database_connection
        .begin()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let target_product = ProductQuery::get_by_id(&mut transaction, target_product_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let Some(target_product) = target_product else {
        return Err(EndpointError::not_found(
            "Cannot destroy product: record not found!",
        ));
    };


    let successfully_deleted = ProductMutation::delete(&mut transaction, target_product_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    if !successfully_deleted {
        return Err(EndpointError::invalid_database_state(
            "failed to delete a product that existed \
             in a previous call inside the same transaction",
        )
        .with_failure_message(FAILURE_MESSAGE));
    }

    transaction
        .commit()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    info!(
        product_id = %target_product_id,
        "Product deleted."
    );

    EndpointResponseBuilder::ok()
        .with_json_body(target_product.into_api_model())
        .build()
}
