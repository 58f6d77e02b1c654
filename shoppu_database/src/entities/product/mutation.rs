use chrono::Utc;
use rust_decimal::Decimal;
use shoppu_core::{
    id::{CategoryId, ProductId},
    identifier::generate_product_identifier,
};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

use super::{ProductModel, ProductQuery};
use crate::{entities::CategoryMutation, QueryError, QueryResult};


const MAX_IDENTIFIER_GENERATION_ATTEMPTS: usize = 32;



#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub price: Option<Decimal>,
    pub currency: String,
    pub display_currency: String,
}



#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ProductValuesToUpdate {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub display_currency: Option<String>,
}

impl ProductValuesToUpdate {
    fn has_any_values_to_update(&self) -> bool {
        self.category_id.is_some()
            || self.name.is_some()
            || self.price.is_some()
            || self.currency.is_some()
            || self.display_currency.is_some()
    }
}


fn build_product_update_query(
    product_id: ProductId,
    values_to_update: ProductValuesToUpdate,
) -> QueryBuilder<'static, Sqlite> {
    let mut update_query_builder = QueryBuilder::new("UPDATE products SET ");

    let mut separated_set_expressions = update_query_builder.separated(", ");

    if let Some(new_category_id) = values_to_update.category_id {
        separated_set_expressions.push("category_id = ");
        separated_set_expressions.push_bind_unseparated(new_category_id.into_uuid());
    }

    if let Some(new_name) = values_to_update.name {
        separated_set_expressions.push("name = ");
        separated_set_expressions.push_bind_unseparated(new_name);
    }

    if let Some(new_price) = values_to_update.price {
        separated_set_expressions.push("price = ");
        separated_set_expressions.push_bind_unseparated(new_price.to_string());
    }

    if let Some(new_currency) = values_to_update.currency {
        separated_set_expressions.push("currency = ");
        separated_set_expressions.push_bind_unseparated(new_currency);
    }

    if let Some(new_display_currency) = values_to_update.display_currency {
        separated_set_expressions.push("display_currency = ");
        separated_set_expressions.push_bind_unseparated(new_display_currency);
    }

    separated_set_expressions.push("updated_at = ");
    separated_set_expressions.push_bind_unseparated(Utc::now());


    update_query_builder.push(" WHERE id = ");
    update_query_builder.push_bind(product_id.into_uuid());

    update_query_builder
}


async fn generate_unique_product_identifier(
    database_connection: &mut SqliteConnection,
) -> QueryResult<String> {
    for _ in 0..MAX_IDENTIFIER_GENERATION_ATTEMPTS {
        let identifier = generate_product_identifier();

        if !ProductQuery::exists_by_identifier(database_connection, &identifier).await? {
            return Ok(identifier);
        }
    }

    Err(QueryError::model_error(
        "unable to generate a unique product identifier",
    ))
}


async fn get_product_category_id(
    database_connection: &mut SqliteConnection,
    product_id: ProductId,
) -> QueryResult<Option<CategoryId>> {
    let category_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT category_id FROM products WHERE id = ?",
    )
    .bind(product_id.into_uuid())
    .fetch_optional(database_connection)
    .await?;

    Ok(category_id.map(CategoryId::new))
}




/// Product writes. Every method also keeps the owning categories'
/// `products_count` in sync, so callers should run them inside a transaction.
pub struct ProductMutation;

impl ProductMutation {
    pub async fn create(
        database_connection: &mut SqliteConnection,
        new_product: NewProduct,
    ) -> QueryResult<ProductModel> {
        let new_product_id = ProductId::generate();
        let new_product_identifier = generate_unique_product_identifier(database_connection).await?;
        let new_product_created_at = Utc::now();
        let new_product_updated_at = new_product_created_at;

        sqlx::query(
            "INSERT INTO products \
                (id, category_id, name, price, currency, display_currency, \
                 p_identifier, created_at, updated_at) \
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new_product_id.into_uuid())
        .bind(new_product.category_id.into_uuid())
        .bind(new_product.name)
        .bind(new_product.price.map(|price| price.to_string()))
        .bind(new_product.currency)
        .bind(new_product.display_currency)
        .bind(new_product_identifier)
        .bind(new_product_created_at)
        .bind(new_product_updated_at)
        .execute(&mut *database_connection)
        .await?;

        CategoryMutation::adjust_products_count(database_connection, new_product.category_id, 1)
            .await?;


        ProductQuery::get_by_id(database_connection, new_product_id)
            .await?
            .ok_or_else(|| {
                QueryError::database_inconsistency("newly inserted product could not be read back")
            })
    }


    pub async fn update(
        database_connection: &mut SqliteConnection,
        product_id: ProductId,
        product_values_to_update: ProductValuesToUpdate,
    ) -> QueryResult<bool> {
        let Some(previous_category_id) =
            get_product_category_id(database_connection, product_id).await?
        else {
            return Ok(false);
        };

        if !product_values_to_update.has_any_values_to_update() {
            return Ok(true);
        }


        let new_category_id = product_values_to_update
            .category_id
            .filter(|category_id| *category_id != previous_category_id);

        let mut update_query_builder =
            build_product_update_query(product_id, product_values_to_update);

        let query_result = update_query_builder
            .build()
            .execute(&mut *database_connection)
            .await?;

        if query_result.rows_affected() != 1 {
            return Ok(false);
        }


        if let Some(new_category_id) = new_category_id {
            CategoryMutation::adjust_products_count(database_connection, previous_category_id, -1)
                .await?;
            CategoryMutation::adjust_products_count(database_connection, new_category_id, 1)
                .await?;
        }

        Ok(true)
    }


    pub async fn delete(
        database_connection: &mut SqliteConnection,
        product_id: ProductId,
    ) -> QueryResult<bool> {
        let Some(category_id) = get_product_category_id(database_connection, product_id).await?
        else {
            return Ok(false);
        };

        let query_result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id.into_uuid())
            .execute(&mut *database_connection)
            .await?;

        if query_result.rows_affected() != 1 {
            return Err(QueryError::database_inconsistency(
                "product disappeared while it was being deleted",
            ));
        }

        CategoryMutation::adjust_products_count(database_connection, category_id, -1).await?;

        Ok(true)
    }
}
