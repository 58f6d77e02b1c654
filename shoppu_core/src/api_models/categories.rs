use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::id::CategoryId;


#[derive(Serialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "01928f3e-8c4e-7ad2-9b1c-5ad1e02e8a11",
        "name": "Sneakers",
        "displayName": "[a3-0f-9c] Shoes > [7b-12-e4] Sneakers",
        "parentId": "01928f3e-7a10-7c3b-8f2d-0c6e1b9d4f20",
        "parentName": "Shoes",
        "productsCount": 3
    })
)]
pub struct Category {
    #[schema(value_type = String, format = Uuid)]
    pub id: CategoryId,

    pub name: String,

    /// Display names of all ancestors and this category, joined by ` > `.
    pub display_name: String,

    /// Self-reference to the parent category, if any.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_id: Option<CategoryId>,

    /// Name of the parent category, if any.
    pub parent_name: Option<String>,

    /// Number of products in this category.
    pub products_count: u64,
}



/// Category fields accepted on creation. A missing name is
/// reported as a validation failure, not as a malformed request.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryCreationFields {
    pub name: Option<String>,

    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_id: Option<CategoryId>,
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(deny_unknown_fields)]
#[schema(
    example = json!({
        "category": {
            "name": "Shoes",
            "parentId": null
        }
    })
)]
pub struct CategoryCreationRequest {
    pub category: CategoryCreationFields,
}



#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryUpdateFields {
    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,

    /// # Interpreting the double option
    /// To distinguish from an unset and a null JSON value, this field is a
    /// double option. `None` indicates the field was not present
    /// (i.e. that the parent category should not change as part of this update),
    /// while `Some(None)` indicates it was set to `null`
    /// (i.e. that the parent category should be cleared).
    ///
    /// See also: [`serde_with::rust::double_option`].
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[cfg_attr(
        feature = "serde_impls_for_client_on_models",
        serde(skip_serializing_if = "Option::is_none")
    )]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_id: Option<Option<CategoryId>>,
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Serialize))]
#[serde(deny_unknown_fields)]
#[schema(
    example = json!({
        "category": {
            "name": "Footwear"
        }
    })
)]
pub struct CategoryUpdateRequest {
    pub category: CategoryUpdateFields,
}
