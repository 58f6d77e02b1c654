use std::{net::TcpListener, path::PathBuf};

use actix_web::web::Data;
use reqwest::{header, Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use shoppu::{server::build_http_server, state::ApplicationStateInner};
use shoppu_configuration::Configuration;
use shoppu_database::establish_in_memory_database;

use crate::TestResponse;

pub const TEST_USER_AGENT: &str = concat!("shoppu-e2e-test/", env!("CARGO_PKG_VERSION"));

pub const TEST_ANTI_FORGERY_TOKEN: &str = "shoppu-test-anti-forgery-token";

const TEST_CONFIGURATION: &str = r#"
    [logging]
    console_output_level_filter = "warn"
    log_file_output_level_filter = "warn"
    log_file_output_directory = "./data/logs"

    [http]
    host = "127.0.0.1"
    port = 3000
    anti_forgery_token = "shoppu-test-anti-forgery-token"

    [database]
    url = "sqlite::memory:"
"#;


/// A Shoppu server running in the background of the current test,
/// backed by its own in-memory database.
pub struct TestServer {
    base_url: String,

    anti_forgery_token: String,

    client: Client,
}

impl TestServer {
    pub fn new(base_url: String, anti_forgery_token: String) -> Self {
        let client = ClientBuilder::new()
            .user_agent(TEST_USER_AGENT)
            .build()
            .expect("failed to set up reqwest client");

        Self {
            base_url,
            anti_forgery_token,
            client,
        }
    }

    /// E.g. `http://127.0.0.1:41234`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anti_forgery_token(&self) -> &str {
        &self.anti_forgery_token
    }

    pub async fn reset_server(&self) {
        let response = self
            .request(Method::POST, "/testing/full-reset")
            .send()
            .await;

        response.assert_status_equals(StatusCode::OK);
    }

    /// Prepares a request. Mutating requests carry the anti-forgery token
    /// unless [`TestRequestBuilder::without_anti_forgery_token`] is called.
    pub fn request<U>(&self, method: Method, endpoint: U) -> TestRequestBuilder
    where
        U: AsRef<str>,
    {
        let is_mutating = method != Method::GET && method != Method::HEAD;

        let request_builder = self.client.request(
            method,
            format!("{}{}", self.base_url, endpoint.as_ref()),
        );

        TestRequestBuilder {
            request_builder,
            anti_forgery_token: is_mutating.then(|| self.anti_forgery_token.clone()),
        }
    }
}


pub struct TestRequestBuilder {
    request_builder: RequestBuilder,

    anti_forgery_token: Option<String>,
}

impl TestRequestBuilder {
    pub fn without_anti_forgery_token(mut self) -> Self {
        self.anti_forgery_token = None;
        self
    }

    pub fn with_anti_forgery_token<S>(mut self, token: S) -> Self
    where
        S: Into<String>,
    {
        self.anti_forgery_token = Some(token.into());
        self
    }

    pub fn with_json_body<V>(mut self, value: V) -> Self
    where
        V: Serialize,
    {
        let serialized_body = serde_json::to_vec(&value).expect("failed to serialize value to JSON");

        self.request_builder = self.request_builder.body(serialized_body);
        self.request_builder = self.request_builder.header(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        self
    }

    /// Sends `body` as-is, with a JSON content type.
    pub fn with_raw_json_body<B>(mut self, body: B) -> Self
    where
        B: Into<reqwest::Body>,
    {
        self.request_builder = self.request_builder.body(body).header(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        self
    }

    pub async fn send(self) -> TestResponse {
        let request_builder = match self.anti_forgery_token {
            Some(token) => self.request_builder.header("X-CSRF-Token", token),
            None => self.request_builder,
        };

        let response = request_builder
            .send()
            .await
            .expect("failed to perform HTTP request");

        TestResponse::from_reqwest_response(response).await
    }
}


/// Starts a server on an ephemeral local port, backed by a fresh in-memory database.
///
/// Must be called from within a tokio runtime.
pub async fn initialize_test_server() -> TestServer {
    let configuration = Configuration::load_from_str(
        TEST_CONFIGURATION,
        PathBuf::from("test-configuration.toml"),
    )
    .expect("failed to load test configuration");

    let database_pool = establish_in_memory_database()
        .await
        .expect("failed to set up in-memory database");

    let state = Data::new(ApplicationStateInner::with_database_pool(
        configuration,
        database_pool,
    ));
    let anti_forgery_token = state.anti_forgery_token.clone();

    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind to an ephemeral port");
    let port = listener
        .local_addr()
        .expect("failed to obtain local address")
        .port();

    let server = build_http_server(state, listener, Some(1)).expect("failed to build HTTP server");
    tokio::spawn(server);

    TestServer::new(
        format!("http://127.0.0.1:{port}"),
        anti_forgery_token,
    )
}
