use chrono::{DateTime, Utc};
use shoppu_core::{
    display::CategoryLineageEntry,
    id::CategoryId,
};
use uuid::Uuid;

use crate::IntoExternalModel;


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CategoryModel {
    pub id: CategoryId,

    pub parent_id: Option<CategoryId>,

    pub name: String,

    pub products_count: u64,

    /// Short identifier, e.g. `a3-0f-9c`.
    pub identifier: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl CategoryModel {
    pub fn lineage_entry(&self) -> CategoryLineageEntry {
        CategoryLineageEntry {
            parent_id: self.parent_id,
            identifier: self.identifier.clone(),
            name: self.name.clone(),
        }
    }
}


#[derive(sqlx::FromRow)]
pub(super) struct InternalCategoryModel {
    pub(super) id: Uuid,

    pub(super) parent_id: Option<Uuid>,

    pub(super) name: String,

    pub(super) products_count: i64,

    pub(super) g_identifier: Option<String>,

    pub(super) created_at: DateTime<Utc>,

    pub(super) updated_at: DateTime<Utc>,
}

impl IntoExternalModel for InternalCategoryModel {
    type ExternalModel = CategoryModel;

    fn into_external_model(self) -> Self::ExternalModel {
        CategoryModel {
            id: CategoryId::new(self.id),
            parent_id: self.parent_id.map(CategoryId::new),
            name: self.name,
            products_count: u64::try_from(self.products_count).unwrap_or(0),
            identifier: self.g_identifier,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}


/// The subset of columns needed to resolve display names.
#[derive(sqlx::FromRow)]
pub(super) struct InternalCategoryLineageModel {
    pub(super) id: Uuid,

    pub(super) parent_id: Option<Uuid>,

    pub(super) name: String,

    pub(super) g_identifier: Option<String>,
}

impl IntoExternalModel for InternalCategoryLineageModel {
    type ExternalModel = (CategoryId, CategoryLineageEntry);

    fn into_external_model(self) -> Self::ExternalModel {
        (
            CategoryId::new(self.id),
            CategoryLineageEntry {
                parent_id: self.parent_id.map(CategoryId::new),
                identifier: self.g_identifier,
                name: self.name,
            },
        )
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CategoryOptionModel {
    pub id: CategoryId,
    pub name: String,
}

#[derive(sqlx::FromRow)]
pub(super) struct InternalCategoryOptionModel {
    pub(super) id: Uuid,

    pub(super) name: String,
}

impl IntoExternalModel for InternalCategoryOptionModel {
    type ExternalModel = CategoryOptionModel;

    fn into_external_model(self) -> Self::ExternalModel {
        CategoryOptionModel {
            id: CategoryId::new(self.id),
            name: self.name,
        }
    }
}
