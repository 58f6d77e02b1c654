use reqwest::{Method, StatusCode};
use shoppu_core::{
    api_models::{Category, CategoryCreationFields, CategoryCreationRequest},
    id::CategoryId,
};

use crate::TestServer;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SampleCategory {
    Shoes,
    Sneakers,
    Hats,
    Accessories,
}

impl SampleCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SampleCategory::Shoes => "Shoes",
            SampleCategory::Sneakers => "Sneakers",
            SampleCategory::Hats => "Hats",
            SampleCategory::Accessories => "Accessories",
        }
    }
}


pub async fn create_category(
    server: &TestServer,
    name: &str,
    parent_id: Option<CategoryId>,
) -> Category {
    let creation_response = server
        .request(Method::POST, "/api/categories")
        .with_json_body(CategoryCreationRequest {
            category: CategoryCreationFields {
                name: Some(name.to_string()),
                parent_id,
            },
        })
        .send()
        .await;

    creation_response.assert_status_equals(StatusCode::OK);
    creation_response.json_body::<Category>()
}

pub async fn create_sample_category(
    server: &TestServer,
    category: SampleCategory,
    parent_id: Option<CategoryId>,
) -> Category {
    create_category(server, category.name(), parent_id).await
}
