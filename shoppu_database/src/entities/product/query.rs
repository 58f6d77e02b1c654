use shoppu_core::id::ProductId;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::{InternalProductModel, InternalProductOptionModel, ProductModel, ProductOptionModel};
use crate::{
    push_list_options,
    IntoExternalModel,
    ListOptions,
    QueryResult,
    TryIntoExternalModel,
};


const PRODUCT_SELECT_WITH_CATEGORY_NAME: &str = "SELECT \
        products.id, products.category_id, categories.name AS category_name, \
        products.name, products.price, products.currency, \
        products.display_currency, products.p_identifier, \
        products.created_at, products.updated_at \
    FROM products \
        INNER JOIN categories ON categories.id = products.category_id";



pub struct ProductQuery;

impl ProductQuery {
    pub async fn count(database_connection: &mut SqliteConnection) -> QueryResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(database_connection)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Lists products ordered by name, optionally filtered by name and paginated.
    pub async fn get_all(
        database_connection: &mut SqliteConnection,
        list_options: &ListOptions,
    ) -> QueryResult<Vec<ProductModel>> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(PRODUCT_SELECT_WITH_CATEGORY_NAME);

        push_list_options(
            &mut query_builder,
            list_options,
            "products.name",
            "products.name ASC, products.id ASC",
        );

        let internal_products = query_builder
            .build_query_as::<InternalProductModel>()
            .fetch_all(database_connection)
            .await?;

        internal_products
            .into_iter()
            .map(InternalProductModel::try_into_external_model)
            .collect()
    }

    pub async fn get_by_id(
        database_connection: &mut SqliteConnection,
        product_id: ProductId,
    ) -> QueryResult<Option<ProductModel>> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(PRODUCT_SELECT_WITH_CATEGORY_NAME);
        query_builder.push(" WHERE products.id = ");
        query_builder.push_bind(product_id.into_uuid());

        let internal_product = query_builder
            .build_query_as::<InternalProductModel>()
            .fetch_optional(database_connection)
            .await?;

        internal_product
            .map(InternalProductModel::try_into_external_model)
            .transpose()
    }

    pub async fn exists_by_id(
        database_connection: &mut SqliteConnection,
        product_id: ProductId,
    ) -> QueryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 \
                    FROM products \
                    WHERE id = ?\
            )",
        )
        .bind(product_id.into_uuid())
        .fetch_one(database_connection)
        .await?;

        Ok(exists)
    }

    pub async fn exists_by_identifier(
        database_connection: &mut SqliteConnection,
        identifier: &str,
    ) -> QueryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 \
                    FROM products \
                    WHERE p_identifier = ?\
            )",
        )
        .bind(identifier)
        .fetch_one(database_connection)
        .await?;

        Ok(exists)
    }

    /// Lists `(id, name)` pairs ordered by name.
    pub async fn get_all_options(
        database_connection: &mut SqliteConnection,
    ) -> QueryResult<Vec<ProductOptionModel>> {
        let internal_options = sqlx::query_as::<_, InternalProductOptionModel>(
            "SELECT id, name FROM products ORDER BY name ASC, id ASC",
        )
        .fetch_all(database_connection)
        .await?;

        Ok(internal_options
            .into_iter()
            .map(InternalProductOptionModel::into_external_model)
            .collect())
    }
}
