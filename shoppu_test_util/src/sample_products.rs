use std::str::FromStr;

use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use shoppu_core::{
    api_models::{Product, ProductCreationFields, ProductCreationRequest},
    id::CategoryId,
};

use crate::TestServer;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SampleProduct {
    Zephyr,
    Boreas,
    Notus,
    Eurus,
}

impl SampleProduct {
    pub fn name(&self) -> &'static str {
        match self {
            SampleProduct::Zephyr => "Zephyr",
            SampleProduct::Boreas => "Boreas",
            SampleProduct::Notus => "Notus",
            SampleProduct::Eurus => "Eurus",
        }
    }

    pub fn price(&self) -> Decimal {
        let price = match self {
            SampleProduct::Zephyr => "89.90",
            SampleProduct::Boreas => "120.00",
            SampleProduct::Notus => "45.50",
            SampleProduct::Eurus => "10.00",
        };

        Decimal::from_str(price).expect("sample prices are valid decimals")
    }
}


pub async fn create_sample_product(
    server: &TestServer,
    product: SampleProduct,
    category_id: CategoryId,
) -> Product {
    let creation_response = server
        .request(Method::POST, "/api/products")
        .with_json_body(ProductCreationRequest {
            product: ProductCreationFields {
                category_id: Some(category_id),
                name: Some(product.name().to_string()),
                price: Some(product.price()),
                currency: None,
                display_currency: None,
            },
        })
        .send()
        .await;

    creation_response.assert_status_equals(StatusCode::OK);
    creation_response.json_body::<Product>()
}
