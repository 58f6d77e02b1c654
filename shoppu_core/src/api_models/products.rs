use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::id::{CategoryId, ProductId};


#[derive(Serialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "01928f3f-01aa-7e61-a4b5-3c2d9e0f7a18",
        "name": "Trail runner",
        "currency": "EUR",
        "price": 89.9,
        "displayName": "[4be/a1] Trail runner",
        "categoryId": "01928f3e-8c4e-7ad2-9b1c-5ad1e02e8a11",
        "categoryName": "Sneakers",
        "displayCurrency": "USD"
    })
)]
pub struct Product {
    #[schema(value_type = String, format = Uuid)]
    pub id: ProductId,

    pub name: String,

    /// Currency code the price is stored in.
    pub currency: String,

    /// `null` if the product has no price.
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,

    pub display_name: String,

    #[schema(value_type = String, format = Uuid)]
    pub category_id: CategoryId,

    pub category_name: String,

    /// Currency code the price should be presented in.
    pub display_currency: String,

    /// Price converted into `display_currency`. Never sent by the server,
    /// this is filled in client-side after fetching the exchange rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub display_price: Option<Decimal>,
}



/// Product fields accepted on creation. Missing required fields
/// are reported as validation failures, not as malformed requests.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductCreationFields {
    #[schema(value_type = Option<String>, format = Uuid)]
    pub category_id: Option<CategoryId>,

    pub name: Option<String>,

    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,

    /// Defaults to `EUR`.
    pub currency: Option<String>,

    /// Defaults to `EUR`.
    pub display_currency: Option<String>,
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(deny_unknown_fields)]
#[schema(
    example = json!({
        "product": {
            "categoryId": "01928f3e-8c4e-7ad2-9b1c-5ad1e02e8a11",
            "name": "Trail runner",
            "price": 89.9,
            "currency": "EUR",
            "displayCurrency": "USD"
        }
    })
)]
pub struct ProductCreationRequest {
    pub product: ProductCreationFields,
}



#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductUpdateFields {
    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub category_id: Option<CategoryId>,

    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,

    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,

    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub currency: Option<String>,

    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub display_currency: Option<String>,
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(deny_unknown_fields)]
#[schema(
    example = json!({
        "product": {
            "price": 79.9
        }
    })
)]
pub struct ProductUpdateRequest {
    pub product: ProductUpdateFields,
}
