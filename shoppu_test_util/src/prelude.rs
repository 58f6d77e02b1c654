pub use reqwest::{header, Method, StatusCode};
pub use shoppu_core::api_models::*;
pub use uuid::Uuid;

pub use super::sample_categories::*;
pub use super::sample_products::*;
pub use super::server::{initialize_test_server, TestServer};
pub use super::TestResponse;
