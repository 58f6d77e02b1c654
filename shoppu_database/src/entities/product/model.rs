use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shoppu_core::id::{CategoryId, ProductId};
use uuid::Uuid;

use crate::{IntoExternalModel, QueryError, TryIntoExternalModel};


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProductModel {
    pub id: ProductId,

    pub category_id: CategoryId,

    /// Name of the owning category, joined in at query time.
    pub category_name: String,

    pub name: String,

    pub price: Option<Decimal>,

    pub currency: String,

    pub display_currency: String,

    /// Short identifier, e.g. `4be/a1`.
    pub identifier: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}


#[derive(sqlx::FromRow)]
pub(super) struct InternalProductModel {
    pub(super) id: Uuid,

    pub(super) category_id: Uuid,

    pub(super) category_name: String,

    pub(super) name: String,

    pub(super) price: Option<String>,

    pub(super) currency: String,

    pub(super) display_currency: String,

    pub(super) p_identifier: Option<String>,

    pub(super) created_at: DateTime<Utc>,

    pub(super) updated_at: DateTime<Utc>,
}

impl TryIntoExternalModel for InternalProductModel {
    type ExternalModel = ProductModel;
    type Error = QueryError;

    fn try_into_external_model(self) -> Result<Self::ExternalModel, Self::Error> {
        let price = self
            .price
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|_| {
                QueryError::model_error(format!(
                    "product {} has an unparsable price: {:?}",
                    self.id, self.price
                ))
            })?;

        Ok(ProductModel {
            id: ProductId::new(self.id),
            category_id: CategoryId::new(self.category_id),
            category_name: self.category_name,
            name: self.name,
            price,
            currency: self.currency,
            display_currency: self.display_currency,
            identifier: self.p_identifier,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProductOptionModel {
    pub id: ProductId,
    pub name: String,
}

#[derive(sqlx::FromRow)]
pub(super) struct InternalProductOptionModel {
    pub(super) id: Uuid,

    pub(super) name: String,
}

impl IntoExternalModel for InternalProductOptionModel {
    type ExternalModel = ProductOptionModel;

    fn into_external_model(self) -> Self::ExternalModel {
        ProductOptionModel {
            id: ProductId::new(self.id),
            name: self.name,
        }
    }
}
