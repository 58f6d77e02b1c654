use shoppu_core::{
    api_models::{Category, SelectOption},
    display::{identified_name, CategoryLineage},
};
use shoppu_database::entities::{CategoryModel, CategoryOptionModel};

use crate::api::traits::{IntoApiModel, IntoApiModelWithContext};


impl IntoApiModelWithContext<CategoryLineage> for CategoryModel {
    type ApiModel = Category;

    fn into_api_model_with(self, lineage: &CategoryLineage) -> Self::ApiModel {
        // The lineage can be stale for a category that was just deleted.
        let display_name = lineage
            .display_name(self.id)
            .unwrap_or_else(|| identified_name(self.identifier.as_deref(), &self.name));

        let parent_name = self
            .parent_id
            .and_then(|parent_id| lineage.get(parent_id))
            .map(|parent| parent.name.clone());

        Category {
            id: self.id,
            name: self.name,
            display_name,
            parent_id: self.parent_id,
            parent_name,
            products_count: self.products_count,
        }
    }
}


impl IntoApiModel for CategoryOptionModel {
    type ApiModel = SelectOption;

    fn into_api_model(self) -> Self::ApiModel {
        SelectOption {
            value: self.id.into_uuid(),
            text: self.name,
        }
    }
}
