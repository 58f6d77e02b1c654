//! Provides ways of handling errors in API endpoint functions
//! and ways to have those errors automatically turned into correct
//! HTTP error responses when returned as `Err(error)` from those functions.
//!
//! Every error response carries a [`NotificationResponse`] body, e.g.
//! `{"notification": {"level": "error", "message": "Cannot show category: record not found!"}}`.

use std::borrow::Cow;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use shoppu_core::api_models::{NotificationResponse, UNKNOWN_ERROR_MESSAGE};
use shoppu_core::validation::ValidationError;
use shoppu_database::QueryError;
use thiserror::Error;
use tracing::{error, warn};


/// General-purpose Shoppu API error type.
///
/// Use this type alongside an [`EndpointResult`] return type in your actix endpoint handlers
/// to allow you to easily `?`-return errors and automatically convert them
/// into HTTP 4xx and 5xx errors with a notification body.
///
/// Database errors convert into [`EndpointError::ServiceUnavailable`] when retrying
/// might help and into [`EndpointError::Internal`] otherwise. Both carry a generic
/// message; use [`EndpointErrorContext::with_failure_message`] to describe
/// which operation failed.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// `404 Not Found`.
    #[error("not found: {message}")]
    NotFound { message: Cow<'static, str> },

    /// The record failed validation; `406 Not Acceptable`.
    #[error("validation failed: {message}")]
    ValidationFailed { message: Cow<'static, str> },

    /// Malformed JSON body, unknown fields, invalid query parameters
    /// or an invalid ID in the path; `400 Bad Request`.
    #[error("invalid request: {message}")]
    InvalidRequest { message: Cow<'static, str> },

    /// A mutating request without a matching `X-CSRF-Token` header;
    /// `422 Unprocessable Entity`.
    #[error("missing or invalid anti-forgery token")]
    InvalidAntiForgeryToken,

    /// A failure that may go away if the request is retried; `503 Service Unavailable`.
    /// The source error is logged, but doesn't leak through the API.
    #[error("service unavailable: {message}")]
    ServiceUnavailable {
        message: Cow<'static, str>,

        #[source]
        error: Box<dyn std::error::Error>,
    },

    /// Any other failure; `500 Internal Server Error`.
    /// The source error is logged, but doesn't leak through the API.
    #[error("internal error: {message}")]
    Internal {
        message: Cow<'static, str>,

        #[source]
        error: Box<dyn std::error::Error>,
    },
}

impl EndpointError {
    pub fn not_found<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Builds a validation failure, e.g. `"Cannot create category: name can't be blank!"`
    /// from the `"Cannot create category"` prefix.
    pub fn validation_failed(message_prefix: &str, reason: ValidationError) -> Self {
        Self::ValidationFailed {
            message: Cow::Owned(format!("{message_prefix}: {reason}!")),
        }
    }

    pub fn invalid_request<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn internal_error<E>(error: E) -> Self
    where
        E: std::error::Error + 'static,
    {
        Self::Internal {
            message: Cow::Borrowed(UNKNOWN_ERROR_MESSAGE),
            error: Box::new(error),
        }
    }

    /// Initialize a new internal API error using an internal reason string.
    /// The **reason is not leaked through the API**, only logged.
    pub fn internal_error_with_reason<S>(reason: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::Internal {
            message: Cow::Borrowed(UNKNOWN_ERROR_MESSAGE),
            error: Box::<dyn std::error::Error>::from(reason.into().into_owned()),
        }
    }

    pub fn invalid_database_state<S>(problem: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::internal_error(QueryError::database_inconsistency(problem))
    }

    /// Replaces the user-facing message of server-side failures
    /// ([`Self::ServiceUnavailable`] and [`Self::Internal`]).
    /// Client errors already carry a specific message and are left as-is.
    pub fn with_failure_message<M>(self, new_message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        match self {
            Self::ServiceUnavailable { error, .. } => Self::ServiceUnavailable {
                message: new_message.into(),
                error,
            },
            Self::Internal { error, .. } => Self::Internal {
                message: new_message.into(),
                error,
            },
            other => other,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::ValidationFailed { message }
            | Self::InvalidRequest { message }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
            Self::InvalidAntiForgeryToken => "Cannot process request: invalid authenticity token!",
        }
    }
}

impl ResponseError for EndpointError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ValidationFailed { .. } => StatusCode::NOT_ACCEPTABLE,
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidAntiForgeryToken => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::ServiceUnavailable { message, error } => {
                warn!(error = ?error, "{message}");
            }
            Self::Internal { message, error } => {
                error!(error = ?error, "{message}");
            }
            _ => {}
        }

        EndpointResponseBuilder::new(self.status_code())
            .with_json_body(NotificationResponse::error(self.message().to_string()))
            .build()
            .unwrap_or_else(|_| HttpResponse::InternalServerError().finish())
    }
}


impl From<QueryError> for EndpointError {
    fn from(value: QueryError) -> Self {
        let message = Cow::Borrowed(UNKNOWN_ERROR_MESSAGE);

        if value.is_transient() {
            Self::ServiceUnavailable {
                message,
                error: Box::new(value),
            }
        } else {
            Self::Internal {
                message,
                error: Box::new(value),
            }
        }
    }
}

impl From<sqlx::Error> for EndpointError {
    fn from(value: sqlx::Error) -> Self {
        Self::from(QueryError::from(value))
    }
}



/// Attaches an operation-specific message to server-side failures,
/// e.g. `"Cannot list categories: unknown error!"`.
pub trait EndpointErrorContext<T> {
    fn with_failure_message(self, message: &'static str) -> Result<T, EndpointError>;
}

impl<T, E> EndpointErrorContext<T> for Result<T, E>
where
    E: Into<EndpointError>,
{
    fn with_failure_message(self, message: &'static str) -> Result<T, EndpointError> {
        self.map_err(|error| error.into().with_failure_message(message))
    }
}




pub struct EndpointResponseBuilder {
    status_code: StatusCode,

    body: Option<Result<Vec<u8>, serde_json::Error>>,

    additional_headers: Vec<(HeaderName, HeaderValue)>,
}

impl EndpointResponseBuilder {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            body: None,
            additional_headers: Vec::with_capacity(1),
        }
    }

    #[inline]
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_json_body<S>(mut self, data: S) -> Self
    where
        S: Serialize,
    {
        let body = serde_json::to_vec(&data);

        self.additional_headers.push((
            header::CONTENT_TYPE,
            HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
        ));

        Self {
            status_code: self.status_code,
            body: Some(body),
            additional_headers: self.additional_headers,
        }
    }

    pub fn build(self) -> Result<HttpResponse<BoxBody>, EndpointError> {
        let optional_body = match self.body {
            Some(body_or_error) => match body_or_error {
                Ok(body) => Some(body),
                Err(serialization_error) => {
                    return Err(EndpointError::internal_error(serialization_error))
                }
            },
            None => None,
        };


        let mut response_builder = HttpResponse::build(self.status_code);

        for (header_name, header_value) in self.additional_headers {
            response_builder.insert_header((header_name, header_value));
        }


        match optional_body {
            Some(body) => Ok(response_builder.body(body.boxed())),
            None => Ok(response_builder.body(().boxed())),
        }
    }
}




/// Short for [`Result`]`<`[`HttpResponse`]`, `[`EndpointError`]`>`, intended to be used in most
/// places in handlers of the Shoppu API.
pub type EndpointResult<Body = BoxBody> = Result<HttpResponse<Body>, EndpointError>;
