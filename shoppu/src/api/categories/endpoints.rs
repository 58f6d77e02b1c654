use actix_web::{delete, get, post, route, web};
use shoppu_core::{
    api_models::{
        CategoryCreationRequest,
        CategoryUpdateRequest,
        CountResponse,
    },
    id::CategoryId,
    validation::{validate_name, ValidationError},
};
use shoppu_database::entities::{
    CategoryMutation,
    CategoryQuery,
    CategoryValuesToUpdate,
    NewCategory,
};
use sqlx::{Connection, SqliteConnection};
use tracing::info;

use crate::{
    api::{
        anti_forgery::VerifiedAntiForgeryToken,
        errors::{EndpointError, EndpointErrorContext, EndpointResponseBuilder, EndpointResult},
        parse_uuid,
        traits::{IntoApiModel, IntoApiModelWithContext},
        IndexParameters,
    },
    state::ApplicationState,
};



/// Ensures no *other* category already uses `name`.
async fn ensure_name_is_available(
    database_connection: &mut SqliteConnection,
    name: &str,
    except_category_id: Option<CategoryId>,
) -> Result<Result<(), ValidationError>, EndpointError> {
    let name_is_taken =
        CategoryQuery::exists_by_name(database_connection, name, except_category_id).await?;

    if name_is_taken {
        return Ok(Err(ValidationError::NameAlreadyTaken));
    }

    Ok(Ok(()))
}

async fn ensure_parent_category_exists(
    database_connection: &mut SqliteConnection,
    parent_category_id: CategoryId,
) -> Result<Result<(), ValidationError>, EndpointError> {
    let parent_exists =
        CategoryQuery::exists_by_id(database_connection, parent_category_id).await?;

    if !parent_exists {
        return Ok(Err(ValidationError::ParentCategoryNotFound));
    }

    Ok(Ok(()))
}



/// Count categories
///
/// Returns the total number of categories.
#[utoipa::path(
    get,
    path = "/api/categories/count",
    tag = "category",
    responses(
        (status = 200, description = "Number of categories.", body = CountResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("/count")]
pub async fn get_category_count(state: ApplicationState) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot count categories: unknown error!";

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let count = CategoryQuery::count(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    EndpointResponseBuilder::ok()
        .with_json_body(CountResponse { count })
        .build()
}



/// List categories
///
/// Returns categories ordered by ID (i.e. by creation time), optionally
/// filtered by a name search term and paginated.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "category",
    params(IndexParameters),
    responses(
        (status = 200, description = "The category list.", body = [shoppu_core::api_models::Category]),
        (status = 400, description = "Invalid query parameters.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("")]
pub async fn get_all_categories(
    state: ApplicationState,
    parameters: web::Query<IndexParameters>,
) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot list categories: unknown error!";

    let list_options = parameters.into_inner().into_list_options();

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let categories = CategoryQuery::get_all(&mut database_connection, &list_options)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let lineage = CategoryQuery::get_lineage(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let categories = categories
        .into_iter()
        .map(|category| category.into_api_model_with(&lineage))
        .collect::<Vec<_>>();

    EndpointResponseBuilder::ok()
        .with_json_body(categories)
        .build()
}



/// Category options
///
/// Returns all categories as `{value, text}` pairs ordered by name,
/// for use with HTML select fields.
#[utoipa::path(
    get,
    path = "/api/categories/options",
    tag = "category",
    responses(
        (status = 200, description = "The category options.", body = [shoppu_core::api_models::SelectOption]),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("/options")]
pub async fn get_category_options(state: ApplicationState) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot fetch categories: unknown error!";

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let options = CategoryQuery::get_all_options(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?
        .into_iter()
        .map(IntoApiModel::into_api_model)
        .collect::<Vec<_>>();

    EndpointResponseBuilder::ok()
        .with_json_body(options)
        .build()
}



/// Get category
///
/// Returns a single category.
#[utoipa::path(
    get,
    path = "/api/categories/{category_id}",
    tag = "category",
    params(
        ("category_id" = String, Path, format = Uuid, description = "ID of the category.")
    ),
    responses(
        (status = 200, description = "Category information.", body = shoppu_core::api_models::Category),
        (status = 400, description = "Invalid category ID.", body = shoppu_core::api_models::NotificationResponse),
        (status = 404, description = "Category does not exist.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[get("/{category_id}")]
pub async fn get_specific_category(
    state: ApplicationState,
    parameters: web::Path<(String,)>,
) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot show category: unknown error!";

    let target_category_id = parse_uuid::<CategoryId>(parameters.into_inner().0)?;

    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let category = CategoryQuery::get_by_id(&mut database_connection, target_category_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let Some(category) = category else {
        return Err(EndpointError::not_found(
            "Cannot show category: record not found!",
        ));
    };


    let lineage = CategoryQuery::get_lineage(&mut database_connection)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    EndpointResponseBuilder::ok()
        .with_json_body(category.into_api_model_with(&lineage))
        .build()
}



/// Create a new category
///
/// Validates and stores a new category. The name must be present and unique,
/// and the parent category (if any) must exist.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "category",
    request_body(content = CategoryCreationRequest),
    params(
        ("X-CSRF-Token" = String, Header, description = "Anti-forgery token from the index page.")
    ),
    responses(
        (status = 200, description = "The newly created category.", body = shoppu_core::api_models::Category),
        (status = 400, description = "Malformed request body.", body = shoppu_core::api_models::NotificationResponse),
        (status = 406, description = "The category failed validation.", body = shoppu_core::api_models::NotificationResponse),
        (status = 422, description = "Missing or invalid anti-forgery token.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[post("")]
pub async fn create_category(
    state: ApplicationState,
    _anti_forgery_token: VerifiedAntiForgeryToken,
    request_body: web::Json<CategoryCreationRequest>,
) -> EndpointResult {
    const VALIDATION_FAILURE_PREFIX: &str = "Cannot create category";
    const FAILURE_MESSAGE: &str = "Cannot create category: unknown error!";

    let fields = request_body.into_inner().category;

    let new_name = validate_name(fields.name.as_deref())
        .map_err(|reason| EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason))?
        .to_string();


    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let mut transaction = database_connection
        .begin()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    ensure_name_is_available(&mut transaction, &new_name, None)
        .await
        .with_failure_message(FAILURE_MESSAGE)?
        .map_err(|reason| EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason))?;

    if let Some(parent_category_id) = fields.parent_id {
        ensure_parent_category_exists(&mut transaction, parent_category_id)
            .await
            .with_failure_message(FAILURE_MESSAGE)?
            .map_err(|reason| {
                EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason)
            })?;
    }


    let newly_created_category = CategoryMutation::create(
        &mut transaction,
        NewCategory {
            name: new_name,
            parent_id: fields.parent_id,
        },
    )
    .await
    .with_failure_message(FAILURE_MESSAGE)?;

    let lineage = CategoryQuery::get_lineage(&mut transaction)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    transaction
        .commit()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    info!(
        category_id = %newly_created_category.id,
        name = newly_created_category.name.as_str(),
        "Category created."
    );

    EndpointResponseBuilder::ok()
        .with_json_body(newly_created_category.into_api_model_with(&lineage))
        .build()
}



/// Update category
///
/// Applies the provided fields to an existing category (both `PUT` and `PATCH`
/// are accepted). Setting `parentId` to `null` turns the category into a root category.
#[utoipa::path(
    put,
    path = "/api/categories/{category_id}",
    tag = "category",
    params(
        ("category_id" = String, Path, format = Uuid, description = "ID of the category to update."),
        ("X-CSRF-Token" = String, Header, description = "Anti-forgery token from the index page.")
    ),
    request_body(content = CategoryUpdateRequest),
    responses(
        (status = 200, description = "Updated category information.", body = shoppu_core::api_models::Category),
        (status = 400, description = "Malformed request body or category ID.", body = shoppu_core::api_models::NotificationResponse),
        (status = 404, description = "Category does not exist.", body = shoppu_core::api_models::NotificationResponse),
        (status = 406, description = "The category failed validation.", body = shoppu_core::api_models::NotificationResponse),
        (status = 422, description = "Missing or invalid anti-forgery token.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[route("/{category_id}", method = "PUT", method = "PATCH")]
pub async fn update_specific_category(
    state: ApplicationState,
    _anti_forgery_token: VerifiedAntiForgeryToken,
    parameters: web::Path<(String,)>,
    request_body: web::Json<CategoryUpdateRequest>,
) -> EndpointResult {
    const VALIDATION_FAILURE_PREFIX: &str = "Cannot update category";
    const FAILURE_MESSAGE: &str = "Cannot update category: unknown error!";

    let target_category_id = parse_uuid::<CategoryId>(parameters.into_inner().0)?;
    let fields = request_body.into_inner().category;


    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let mut transaction = database_connection
        .begin()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let target_category_exists = CategoryQuery::exists_by_id(&mut transaction, target_category_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    if !target_category_exists {
        return Err(EndpointError::not_found(
            "Cannot update category: record not found!",
        ));
    }


    if let Some(new_name) = fields.name.as_deref() {
        validate_name(Some(new_name)).map_err(|reason| {
            EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason)
        })?;

        ensure_name_is_available(&mut transaction, new_name, Some(target_category_id))
            .await
            .with_failure_message(FAILURE_MESSAGE)?
            .map_err(|reason| {
                EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason)
            })?;
    }

    if let Some(Some(new_parent_category_id)) = fields.parent_id {
        ensure_parent_category_exists(&mut transaction, new_parent_category_id)
            .await
            .with_failure_message(FAILURE_MESSAGE)?
            .map_err(|reason| {
                EndpointError::validation_failed(VALIDATION_FAILURE_PREFIX, reason)
            })?;

        let lineage_before_update = CategoryQuery::get_lineage(&mut transaction)
            .await
            .with_failure_message(FAILURE_MESSAGE)?;

        if lineage_before_update.would_create_cycle(target_category_id, new_parent_category_id) {
            return Err(EndpointError::validation_failed(
                VALIDATION_FAILURE_PREFIX,
                ValidationError::ParentCategoryCycle,
            ));
        }
    }


    let successfully_updated = CategoryMutation::update(
        &mut transaction,
        target_category_id,
        CategoryValuesToUpdate {
            name: fields.name,
            parent_id: fields.parent_id,
        },
    )
    .await
    .with_failure_message(FAILURE_MESSAGE)?;

    if !successfully_updated {
        return Err(EndpointError::invalid_database_state(
            "failed to update a category that existed \
             in a previous call inside the same transaction",
        )
        .with_failure_message(FAILURE_MESSAGE));
    }


    let target_category_after_update =
        CategoryQuery::get_by_id(&mut transaction, target_category_id)
            .await
            .with_failure_message(FAILURE_MESSAGE)?;

    let Some(target_category_after_update) = target_category_after_update else {
        return Err(EndpointError::invalid_database_state(
            "failed to fetch a category that was just updated \
             in a previous call inside the same transaction",
        )
        .with_failure_message(FAILURE_MESSAGE));
    };

    let lineage = CategoryQuery::get_lineage(&mut transaction)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    transaction
        .commit()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    EndpointResponseBuilder::ok()
        .with_json_body(target_category_after_update.into_api_model_with(&lineage))
        .build()
}



/// Delete category
///
/// Deletes a category along with all of its products. Child categories
/// are kept, but become root categories. Responds with the deleted category.
#[utoipa::path(
    delete,
    path = "/api/categories/{category_id}",
    tag = "category",
    params(
        ("category_id" = String, Path, format = Uuid, description = "ID of the category to delete."),
        ("X-CSRF-Token" = String, Header, description = "Anti-forgery token from the index page.")
    ),
    responses(
        (status = 200, description = "The deleted category.", body = shoppu_core::api_models::Category),
        (status = 400, description = "Invalid category ID.", body = shoppu_core::api_models::NotificationResponse),
        (status = 404, description = "Category does not exist.", body = shoppu_core::api_models::NotificationResponse),
        (status = 422, description = "Missing or invalid anti-forgery token.", body = shoppu_core::api_models::NotificationResponse),
        (status = 500, description = "Unknown error.", body = shoppu_core::api_models::NotificationResponse),
        (status = 503, description = "Temporary failure, try again.", body = shoppu_core::api_models::NotificationResponse),
    )
)]
#[delete("/{category_id}")]
pub async fn delete_specific_category(
    state: ApplicationState,
    _anti_forgery_token: VerifiedAntiForgeryToken,
    parameters: web::Path<(String,)>,
) -> EndpointResult {
    const FAILURE_MESSAGE: &str = "Cannot destroy category: unknown error!";

    let target_category_id = parse_uuid::<CategoryId>(parameters.into_inner().0)?;


    let mut database_connection = state
        .acquire_database_connection()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let mut transaction = database_connection
        .begin()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    let target_category = CategoryQuery::get_by_id(&mut transaction, target_category_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    let Some(target_category) = target_category else {
        return Err(EndpointError::not_found(
            "Cannot destroy category: record not found!",
        ));
    };

    // Rendered before deleting, while the ancestors are still resolvable.
    let lineage = CategoryQuery::get_lineage(&mut transaction)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;
    let deleted_category = target_category.into_api_model_with(&lineage);


    let successfully_deleted = CategoryMutation::delete(&mut transaction, target_category_id)
        .await
        .with_failure_message(FAILURE_MESSAGE)?;

    if !successfully_deleted {
        return Err(EndpointError::invalid_database_state(
            "failed to delete a category that existed \
             in a previous call inside the same transaction",
        )
        .with_failure_message(FAILURE_MESSAGE));
    }

    transaction
        .commit()
        .await
        .with_failure_message(FAILURE_MESSAGE)?;


    info!(
        category_id = %target_category_id,
        "Category deleted."
    );

    EndpointResponseBuilder::ok()
        .with_json_body(deleted_category)
        .build()
}
