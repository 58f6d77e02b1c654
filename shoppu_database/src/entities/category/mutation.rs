use chrono::Utc;
use shoppu_core::{id::CategoryId, identifier::generate_category_identifier};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::{CategoryModel, CategoryQuery, InternalCategoryModel};
use crate::{IntoExternalModel, QueryError, QueryResult};


/// How many random identifiers we try before giving up on finding a free one.
const MAX_IDENTIFIER_GENERATION_ATTEMPTS: usize = 32;



#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<CategoryId>,
}



#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CategoryValuesToUpdate {
    pub name: Option<String>,
    pub parent_id: Option<Option<CategoryId>>,
}

impl CategoryValuesToUpdate {
    fn has_any_values_to_update(&self) -> bool {
        self.name.is_some() || self.parent_id.is_some()
    }
}


fn build_category_update_query(
    category_id: CategoryId,
    values_to_update: CategoryValuesToUpdate,
) -> QueryBuilder<'static, Sqlite> {
    let mut update_query_builder = QueryBuilder::new("UPDATE categories SET ");

    let mut separated_set_expressions = update_query_builder.separated(", ");

    if let Some(new_name) = values_to_update.name {
        separated_set_expressions.push("name = ");
        separated_set_expressions.push_bind_unseparated(new_name);
    }

    if let Some(new_parent_id) = values_to_update.parent_id {
        separated_set_expressions.push("parent_id = ");
        separated_set_expressions.push_bind_unseparated(new_parent_id.map(CategoryId::into_uuid));
    }

    separated_set_expressions.push("updated_at = ");
    separated_set_expressions.push_bind_unseparated(Utc::now());


    update_query_builder.push(" WHERE id = ");
    update_query_builder.push_bind(category_id.into_uuid());

    update_query_builder
}


async fn generate_unique_category_identifier(
    database_connection: &mut SqliteConnection,
) -> QueryResult<String> {
    for _ in 0..MAX_IDENTIFIER_GENERATION_ATTEMPTS {
        let identifier = generate_category_identifier();

        if !CategoryQuery::exists_by_identifier(database_connection, &identifier).await? {
            return Ok(identifier);
        }
    }

    Err(QueryError::model_error(
        "unable to generate a unique category identifier",
    ))
}




pub struct CategoryMutation;

impl CategoryMutation {
    pub async fn create(
        database_connection: &mut SqliteConnection,
        new_category: NewCategory,
    ) -> QueryResult<CategoryModel> {
        let new_category_id = CategoryId::generate();
        let new_category_identifier = generate_unique_category_identifier(database_connection).await?;
        let new_category_created_at = Utc::now();
        let new_category_updated_at = new_category_created_at;

        let newly_created_category = sqlx::query_as::<_, InternalCategoryModel>(
            "INSERT INTO categories \
                (id, parent_id, name, products_count, g_identifier, \
                 created_at, updated_at) \
                VALUES (?, ?, ?, 0, ?, ?, ?) \
                RETURNING \
                    id, parent_id, name, products_count, \
                    g_identifier, created_at, updated_at",
        )
        .bind(new_category_id.into_uuid())
        .bind(new_category.parent_id.map(CategoryId::into_uuid))
        .bind(new_category.name)
        .bind(new_category_identifier)
        .bind(new_category_created_at)
        .bind(new_category_updated_at)
        .fetch_one(database_connection)
        .await?;

        Ok(newly_created_category.into_external_model())
    }


    pub async fn update(
        database_connection: &mut SqliteConnection,
        category_id: CategoryId,
        category_values_to_update: CategoryValuesToUpdate,
    ) -> QueryResult<bool> {
        if !category_values_to_update.has_any_values_to_update() {
            return CategoryQuery::exists_by_id(database_connection, category_id).await;
        }


        let mut update_query_builder =
            build_category_update_query(category_id, category_values_to_update);

        let query_result = update_query_builder
            .build()
            .execute(database_connection)
            .await?;


        Ok(query_result.rows_affected() == 1)
    }

    /// Deletes a category along with all of its products.
    /// Child categories are detached (they become root categories).
    pub async fn delete(
        database_connection: &mut SqliteConnection,
        category_id: CategoryId,
    ) -> QueryResult<bool> {
        sqlx::query("DELETE FROM products WHERE category_id = ?")
            .bind(category_id.into_uuid())
            .execute(&mut *database_connection)
            .await?;

        sqlx::query("UPDATE categories SET parent_id = NULL, updated_at = ? WHERE parent_id = ?")
            .bind(Utc::now())
            .bind(category_id.into_uuid())
            .execute(&mut *database_connection)
            .await?;

        let query_result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id.into_uuid())
            .execute(&mut *database_connection)
            .await?;


        if query_result.rows_affected() > 1 {
            return Err(QueryError::database_inconsistency(
                "attempted to delete a category by ID, but more than one row matched",
            ));
        }

        Ok(query_result.rows_affected() == 1)
    }

    /// Adds `delta` (which may be negative) to the category's product counter.
    pub async fn adjust_products_count(
        database_connection: &mut SqliteConnection,
        category_id: CategoryId,
        delta: i64,
    ) -> QueryResult<()> {
        let query_result = sqlx::query(
            "UPDATE categories \
                SET products_count = MAX(products_count + ?, 0) \
                WHERE id = ?",
        )
        .bind(delta)
        .bind(category_id.into_uuid())
        .execute(database_connection)
        .await?;

        if query_result.rows_affected() != 1 {
            return Err(QueryError::database_inconsistency(
                "attempted to adjust the product counter of a missing category",
            ));
        }

        Ok(())
    }
}



#[cfg(test)]
mod test {
    use shoppu_core::identifier::is_category_identifier;
    use sqlx::Connection;

    use super::*;
    use crate::{establish_in_memory_database, ListOptions, Pagination};

    async fn create_named(
        database_connection: &mut SqliteConnection,
        name: &str,
        parent_id: Option<CategoryId>,
    ) -> CategoryModel {
        CategoryMutation::create(
            database_connection,
            NewCategory {
                name: name.to_string(),
                parent_id,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn created_categories_are_retrievable() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        let shoes = create_named(&mut database_connection, "Shoes", None).await;

        assert_eq!(shoes.products_count, 0);
        assert!(is_category_identifier(
            shoes.identifier.as_deref().unwrap()
        ));

        let fetched = CategoryQuery::get_by_id(&mut database_connection, shoes.id)
            .await
            .unwrap();
        assert_eq!(fetched, Some(shoes.clone()));

        assert_eq!(
            CategoryQuery::count(&mut database_connection).await.unwrap(),
            1
        );
        assert!(
            CategoryQuery::exists_by_name(&mut database_connection, "Shoes", None)
                .await
                .unwrap()
        );
        assert!(
            !CategoryQuery::exists_by_name(&mut database_connection, "Shoes", Some(shoes.id))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_names_violate_the_unique_index() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        create_named(&mut database_connection, "Shoes", None).await;

        let error = CategoryMutation::create(
            &mut database_connection,
            NewCategory {
                name: "Shoes".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap_err();

        assert!(error.is_unique_violation());
        assert!(!error.is_transient());
    }

    #[tokio::test]
    async fn index_filters_and_paginates_in_id_order() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        for name in ["Boots", "Sandals", "Sneakers", "Hats", "Snowboots"] {
            create_named(&mut database_connection, name, None).await;
        }

        let all = CategoryQuery::get_all(&mut database_connection, &ListOptions::new())
            .await
            .unwrap();
        assert_eq!(all.len(), 5);

        let mut sorted_ids = all.iter().map(|category| category.id).collect::<Vec<_>>();
        sorted_ids.sort();
        assert_eq!(
            sorted_ids,
            all.iter().map(|category| category.id).collect::<Vec<_>>()
        );

        let second_page = CategoryQuery::get_all(
            &mut database_connection,
            &ListOptions::new().with_pagination(Pagination::from_page(2, 2)),
        )
        .await
        .unwrap();
        assert_eq!(second_page, all[2..4].to_vec());

        let filtered = CategoryQuery::get_all(
            &mut database_connection,
            &ListOptions::new().with_name_query("oots"),
        )
        .await
        .unwrap();
        assert_eq!(
            filtered
                .iter()
                .map(|category| category.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Boots", "Snowboots"]
        );
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        create_named(&mut database_connection, "50% off", None).await;
        create_named(&mut database_connection, "500 off", None).await;

        let filtered = CategoryQuery::get_all(
            &mut database_connection,
            &ListOptions::new().with_name_query("0%"),
        )
        .await
        .unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "50% off");
    }

    #[tokio::test]
    async fn updates_apply_only_given_fields() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        let clothing = create_named(&mut database_connection, "Clothing", None).await;
        let shoes = create_named(&mut database_connection, "Shoes", None).await;

        let updated = CategoryMutation::update(
            &mut database_connection,
            shoes.id,
            CategoryValuesToUpdate {
                name: None,
                parent_id: Some(Some(clothing.id)),
            },
        )
        .await
        .unwrap();
        assert!(updated);

        let shoes_after_update = CategoryQuery::get_by_id(&mut database_connection, shoes.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shoes_after_update.name, "Shoes");
        assert_eq!(shoes_after_update.parent_id, Some(clothing.id));

        let lineage = CategoryQuery::get_lineage(&mut database_connection)
            .await
            .unwrap();
        assert_eq!(lineage.parent_name(shoes.id), Some("Clothing"));

        let missing_updated = CategoryMutation::update(
            &mut database_connection,
            CategoryId::generate(),
            CategoryValuesToUpdate {
                name: Some("Nothing".to_string()),
                parent_id: None,
            },
        )
        .await
        .unwrap();
        assert!(!missing_updated);
    }

    #[tokio::test]
    async fn deleting_detaches_children() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        let clothing = create_named(&mut database_connection, "Clothing", None).await;
        let shoes = create_named(&mut database_connection, "Shoes", Some(clothing.id)).await;

        let mut transaction = database_connection.begin().await.unwrap();
        assert!(CategoryMutation::delete(&mut transaction, clothing.id)
            .await
            .unwrap());
        transaction.commit().await.unwrap();

        let shoes_after_delete = CategoryQuery::get_by_id(&mut database_connection, shoes.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shoes_after_delete.parent_id, None);

        assert!(!CategoryMutation::delete(&mut database_connection, clothing.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn products_counter_never_goes_negative() {
        let database_pool = establish_in_memory_database().await.unwrap();
        let mut database_connection = database_pool.acquire().await.unwrap();

        let shoes = create_named(&mut database_connection, "Shoes", None).await;

        CategoryMutation::adjust_products_count(&mut database_connection, shoes.id, 2)
            .await
            .unwrap();
        CategoryMutation::adjust_products_count(&mut database_connection, shoes.id, -5)
            .await
            .unwrap();

        let shoes = CategoryQuery::get_by_id(&mut database_connection, shoes.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shoes.products_count, 0);

        assert!(CategoryMutation::adjust_products_count(
            &mut database_connection,
            CategoryId::generate(),
            1
        )
        .await
        .is_err());
    }
}
