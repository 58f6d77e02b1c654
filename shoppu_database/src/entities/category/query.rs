use shoppu_core::{display::CategoryLineage, id::CategoryId};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::{
    CategoryModel,
    CategoryOptionModel,
    InternalCategoryLineageModel,
    InternalCategoryModel,
    InternalCategoryOptionModel,
};
use crate::{push_list_options, IntoExternalModel, ListOptions, QueryResult};



pub struct CategoryQuery;

impl CategoryQuery {
    pub async fn count(database_connection: &mut SqliteConnection) -> QueryResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(database_connection)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Lists categories in ID (i.e. creation) order, optionally filtered by name and paginated.
    pub async fn get_all(
        database_connection: &mut SqliteConnection,
        list_options: &ListOptions,
    ) -> QueryResult<Vec<CategoryModel>> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT \
                id, parent_id, name, products_count, \
                g_identifier, created_at, updated_at \
            FROM categories",
        );

        push_list_options(&mut query_builder, list_options, "name", "id ASC");

        let internal_categories = query_builder
            .build_query_as::<InternalCategoryModel>()
            .fetch_all(database_connection)
            .await?;

        Ok(internal_categories
            .into_iter()
            .map(InternalCategoryModel::into_external_model)
            .collect())
    }

    pub async fn get_by_id(
        database_connection: &mut SqliteConnection,
        category_id: CategoryId,
    ) -> QueryResult<Option<CategoryModel>> {
        let internal_category = sqlx::query_as::<_, InternalCategoryModel>(
            "SELECT \
                id, parent_id, name, products_count, \
                g_identifier, created_at, updated_at \
            FROM categories \
            WHERE id = ?",
        )
        .bind(category_id.into_uuid())
        .fetch_optional(database_connection)
        .await?;

        Ok(internal_category.map(InternalCategoryModel::into_external_model))
    }

    pub async fn exists_by_id(
        database_connection: &mut SqliteConnection,
        category_id: CategoryId,
    ) -> QueryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 \
                    FROM categories \
                    WHERE id = ?\
            )",
        )
        .bind(category_id.into_uuid())
        .fetch_one(database_connection)
        .await?;

        Ok(exists)
    }

    /// Checks whether the name is taken, ignoring the category
    /// with ID `except_category_id` (useful when renaming).
    pub async fn exists_by_name(
        database_connection: &mut SqliteConnection,
        category_name: &str,
        except_category_id: Option<CategoryId>,
    ) -> QueryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 \
                    FROM categories \
                    WHERE name = ? AND (? IS NULL OR id != ?)\
            )",
        )
        .bind(category_name)
        .bind(except_category_id.map(CategoryId::into_uuid))
        .bind(except_category_id.map(CategoryId::into_uuid))
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
                    FROM categories \
                    WHERE g_identifier = ?\
            )",
        )
        .bind(identifier)
        .fetch_one(database_connection)
        .await?;

        Ok(exists)
    }

    /// Loads the whole category tree (IDs, parents, identifiers and names).
    pub async fn get_lineage(
        database_connection: &mut SqliteConnection,
    ) -> QueryResult<CategoryLineage> {
        let internal_entries = sqlx::query_as::<_, InternalCategoryLineageModel>(
            "SELECT id, parent_id, name, g_identifier FROM categories",
        )
        .fetch_all(database_connection)
        .await?;

        Ok(internal_entries
            .into_iter()
            .map(InternalCategoryLineageModel::into_external_model)
            .collect())
    }

    /// Lists `(id, name)` pairs ordered by name.
    pub async fn get_all_options(
        database_connection: &mut SqliteConnection,
    ) -> QueryResult<Vec<CategoryOptionModel>> {
        let internal_options = sqlx::query_as::<_, InternalCategoryOptionModel>(
            "SELECT id, name FROM categories ORDER BY name ASC",
        )
        .fetch_all(database_connection)
        .await?;

        Ok(internal_options
            .into_iter()
            .map(InternalCategoryOptionModel::into_external_model)
            .collect())
    }
}
