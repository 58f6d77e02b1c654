//! HTTP transport for the REST API.
//!
//! [`RecordTransport`] is the seam the record stores talk through,
//! [`RestTransport`] is its `reqwest`-based implementation.

use std::error::Error;

use reqwest::{header::HeaderValue, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shoppu_core::api_models::{Notification, NotificationResponse};
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;


/// Name of the header mutating requests carry the anti-forgery token in.
pub const ANTI_FORGERY_TOKEN_HEADER_NAME: &str = "X-CSRF-Token";


#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to prepare a URL")]
    UrlPreparationError {
        #[from]
        #[source]
        error: url::ParseError,
    },

    #[error("failed to serialize body data as JSON")]
    RequestBodySerializationError {
        #[source]
        error: serde_json::Error,
    },

    /// The request was sent, but no response was received
    /// (connection refused, reset, timed out, ...).
    #[error("no response was received from the server")]
    NetworkError {
        #[source]
        error: Box<dyn Error + Send + Sync>,
    },

    #[error("server responded with {}", .status_code)]
    UnsuccessfulResponse {
        status_code: StatusCode,

        /// The decoded error envelope, if the body contained one.
        envelope: Option<NotificationResponse>,

        /// Raw response body.
        body: String,
    },

    #[error(
        "failed to extract JSON body from response \
        (either invalid JSON syntax or mismatching content schema)"
    )]
    ResponseJsonBodyError {
        #[source]
        error: serde_json::Error,
    },
}

impl TransportError {
    pub fn network_error<E>(error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::NetworkError {
            error: error.into(),
        }
    }

    /// Builds an [`UnsuccessfulResponse`][Self::UnsuccessfulResponse] error,
    /// decoding the error envelope from `body` if possible.
    pub fn unsuccessful_response(status_code: StatusCode, body: &[u8]) -> Self {
        Self::UnsuccessfulResponse {
            status_code,
            envelope: serde_json::from_slice::<NotificationResponse>(body).ok(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::UnsuccessfulResponse { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether repeating the same request could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } => true,
            Self::UnsuccessfulResponse { status_code, .. } => matches!(
                *status_code,
                StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
            _ => false,
        }
    }

    /// The notification to show the user: the one the server sent,
    /// or a generic alert if it didn't send one.
    pub fn notification(&self) -> Notification {
        match self {
            Self::UnsuccessfulResponse {
                envelope: Some(envelope),
                ..
            } => envelope.notification.clone(),
            _ => Notification::unknown_error(),
        }
    }
}

pub type TransportResult<V> = Result<V, TransportError>;



/// The anti-forgery token the server expects on mutating requests.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    pub fn new<S>(token: S) -> Self
    where
        S: Into<String>,
    {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the token from the `<meta name="csrf-token" content="...">`
    /// tag of an HTML page (the server's index page renders one).
    pub fn extract_from_page(html: &str) -> Option<Self> {
        let mut remaining = html;

        while let Some(tag_start) = remaining.find("<meta") {
            let after_tag_start = &remaining[tag_start + "<meta".len()..];
            let tag_end = after_tag_start.find('>')?;
            let tag_contents = &after_tag_start[..tag_end];

            if attribute_value(tag_contents, "name").as_deref() == Some("csrf-token") {
                return attribute_value(tag_contents, "content").map(Self);
            }

            remaining = &after_tag_start[tag_end..];
        }

        None
    }
}

/// Finds the double-quoted value of `attribute_name` inside a tag and unescapes it.
fn attribute_value(tag_contents: &str, attribute_name: &str) -> Option<String> {
    let needle = format!("{attribute_name}=\"");
    let mut search_from = 0;

    while let Some(relative_position) = tag_contents[search_from..].find(&needle) {
        let position = search_from + relative_position;

        let is_attribute_start = position == 0
            || tag_contents[..position].ends_with(|character: char| character.is_whitespace());

        let value_start = position + needle.len();

        if is_attribute_start {
            let value_length = tag_contents[value_start..].find('"')?;
            let raw_value = &tag_contents[value_start..value_start + value_length];

            return Some(unescape_html(raw_value));
        }

        search_from = value_start;
    }

    None
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}



/// Performs requests against the REST API, one HTTP request per call.
///
/// `path` is the collection path of a record type (e.g. `/api/categories`).
/// Every method decodes the JSON body of a successful response into `V`.
#[allow(async_fn_in_trait)]
pub trait RecordTransport {
    async fn list<V>(&self, path: &str) -> TransportResult<V>
    where
        V: DeserializeOwned;

    async fn list_page<V>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
        query: Option<&str>,
    ) -> TransportResult<V>
    where
        V: DeserializeOwned;

    async fn get_by_id<V>(&self, path: &str, id: Uuid) -> TransportResult<V>
    where
        V: DeserializeOwned;

    async fn create<B, V>(&self, path: &str, body: &B) -> TransportResult<V>
    where
        B: Serialize,
        V: DeserializeOwned;

    async fn update<B, V>(&self, path: &str, id: Uuid, body: &B) -> TransportResult<V>
    where
        B: Serialize,
        V: DeserializeOwned;

    async fn delete<V>(&self, path: &str, id: Uuid) -> TransportResult<V>
    where
        V: DeserializeOwned;
}



#[derive(Debug, Error)]
pub enum TransportInitializationError {
    #[error("unable to initialize reqwest HTTP client")]
    UnableToInitializeReqwestClient {
        #[from]
        #[source]
        error: reqwest::Error,
    },

    #[error("anti-forgery token contains characters not allowed in a header")]
    InvalidAntiForgeryToken,

    #[error("failed to fetch the index page")]
    IndexPageUnavailable {
        #[source]
        error: TransportError,
    },

    #[error("index page does not contain an anti-forgery token")]
    AntiForgeryTokenMissing,
}


/// A page that arrived with a non-2xx status is an
/// [`UnsuccessfulResponse`][TransportError::UnsuccessfulResponse].
fn page_from_response(status_code: StatusCode, body: &[u8]) -> TransportResult<String> {
    if !status_code.is_success() {
        return Err(TransportError::unsuccessful_response(status_code, body));
    }

    Ok(String::from_utf8_lossy(body).into_owned())
}


fn build_client_user_agent() -> String {
    format!(
        "shoppu_api_client / v{}",
        env!("CARGO_PKG_VERSION")
    )
}


/// [`RecordTransport`] over HTTP.
#[derive(Clone)]
pub struct RestTransport {
    /// Origin of the server, e.g. `http://localhost:8080/`.
    server_url: Url,

    http_client: reqwest::Client,

    anti_forgery_token: Option<HeaderValue>,
}

impl RestTransport {
    pub fn new(
        server_url: Url,
        anti_forgery_token: Option<AntiForgeryToken>,
    ) -> Result<Self, TransportInitializationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(build_client_user_agent())
            .build()?;

        let anti_forgery_token = anti_forgery_token
            .map(|token| HeaderValue::from_str(token.as_str()))
            .transpose()
            .map_err(|_| TransportInitializationError::InvalidAntiForgeryToken)?;

        Ok(Self {
            server_url,
            http_client,
            anti_forgery_token,
        })
    }

    /// Fetches the server's index page to obtain the anti-forgery token,
    /// then builds a transport that sends it.
    pub async fn connect(server_url: Url) -> Result<Self, TransportInitializationError> {
        let transport = Self::new(server_url, None)?;

        let index_page_url = transport
            .server_url
            .join("/")
            .map_err(|error| TransportInitializationError::IndexPageUnavailable {
                error: error.into(),
            })?;

        let index_page = transport
            .fetch_page(index_page_url)
            .await
            .map_err(|error| TransportInitializationError::IndexPageUnavailable { error })?;

        let token = AntiForgeryToken::extract_from_page(&index_page)
            .ok_or(TransportInitializationError::AntiForgeryTokenMissing)?;

        Self::new(transport.server_url, Some(token))
    }

    async fn fetch_page(&self, page_url: Url) -> TransportResult<String> {
        let response = self
            .http_client
            .get(page_url)
            .send()
            .await
            .map_err(TransportError::network_error)?;

        let status_code = response.status();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::network_error)?;

        page_from_response(status_code, &body)
    }

    fn endpoint_url(&self, path: &str, id: Option<Uuid>) -> TransportResult<Url> {
        let full_path = match id {
            Some(id) => format!("{}/{}", path.trim_end_matches('/'), id),
            None => path.to_string(),
        };

        Ok(self.server_url.join(&full_path)?)
    }

    fn with_anti_forgery_token(
        &self,
        request_builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match &self.anti_forgery_token {
            Some(token) => request_builder.header(ANTI_FORGERY_TOKEN_HEADER_NAME, token.clone()),
            None => request_builder,
        }
    }

    fn with_json_body<B>(
        request_builder: reqwest::RequestBuilder,
        body: &B,
    ) -> TransportResult<reqwest::RequestBuilder>
    where
        B: Serialize,
    {
        let serialized_body = serde_json::to_vec(body)
            .map_err(|error| TransportError::RequestBodySerializationError { error })?;

        Ok(request_builder
            .header(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(serialized_body))
    }

    async fn execute<V>(&self, request_builder: reqwest::RequestBuilder) -> TransportResult<V>
    where
        V: DeserializeOwned,
    {
        let response = request_builder
            .send()
            .await
            .map_err(TransportError::network_error)?;

        let status_code = response.status();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::network_error)?;

        debug!(
            status = status_code.as_u16(),
            body_length = body.len(),
            "Received response."
        );

        if !status_code.is_success() {
            return Err(TransportError::unsuccessful_response(
                status_code,
                &body,
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|error| TransportError::ResponseJsonBodyError { error })
    }
}

impl RecordTransport for RestTransport {
    async fn list<V>(&self, path: &str) -> TransportResult<V>
    where
        V: DeserializeOwned,
    {
        let url = self.endpoint_url(path, None)?;
        debug!(%url, "GET");

        self.execute(self.http_client.get(url)).await
    }

    async fn list_page<V>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
        query: Option<&str>,
    ) -> TransportResult<V>
    where
        V: DeserializeOwned,
    {
        let mut url = self.endpoint_url(path, None)?;

        {
            let mut query_pairs = url.query_pairs_mut();
            query_pairs
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &per_page.to_string());

            if let Some(query) = query {
                query_pairs.append_pair("query", query);
            }
        }

        debug!(%url, "GET");

        self.execute(self.http_client.get(url)).await
    }

    async fn get_by_id<V>(&self, path: &str, id: Uuid) -> TransportResult<V>
    where
        V: DeserializeOwned,
    {
        let url = self.endpoint_url(path, Some(id))?;
        debug!(%url, "GET");

        self.execute(self.http_client.get(url)).await
    }

    async fn create<B, V>(&self, path: &str, body: &B) -> TransportResult<V>
    where
        B: Serialize,
        V: DeserializeOwned,
    {
        let url = self.endpoint_url(path, None)?;
        debug!(%url, "POST");

        let request_builder = self.with_anti_forgery_token(self.http_client.post(url));
        self.execute(Self::with_json_body(request_builder, body)?)
            .await
    }

    async fn update<B, V>(&self, path: &str, id: Uuid, body: &B) -> TransportResult<V>
    where
        B: Serialize,
        V: DeserializeOwned,
    {
        let url = self.endpoint_url(path, Some(id))?;
        debug!(%url, "PUT");

        let request_builder = self.with_anti_forgery_token(self.http_client.put(url));
        self.execute(Self::with_json_body(request_builder, body)?)
            .await
    }

    async fn delete<V>(&self, path: &str, id: Uuid) -> TransportResult<V>
    where
        V: DeserializeOwned,
    {
        let url = self.endpoint_url(path, Some(id))?;
        debug!(%url, "DELETE");

        self.execute(self.with_anti_forgery_token(self.http_client.delete(url)))
            .await
    }
}
