use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;


/// Fallback message for failures the server did not describe.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error happened.";


#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Notice,
    Alert,
    Error,
}


/// A user-facing message. The server uses it (with [`NotificationLevel::Error`])
/// to describe every failed request, and clients queue them for display.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, ToSchema)]
pub struct Notification {
    pub level: NotificationLevel,

    pub message: String,
}

impl Notification {
    pub fn error<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self {
            level: NotificationLevel::Error,
            message: message.into().into_owned(),
        }
    }

    pub fn alert<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self {
            level: NotificationLevel::Alert,
            message: message.into().into_owned(),
        }
    }

    pub fn unknown_error() -> Self {
        Self::alert(UNKNOWN_ERROR_MESSAGE)
    }
}


/// The error envelope: every non-2xx response from the API carries this body.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[schema(
    example = json!({
        "notification": {
            "level": "error",
            "message": "Cannot show category: record not found!"
        }
    })
)]
pub struct NotificationResponse {
    pub notification: Notification,
}

impl NotificationResponse {
    pub fn error<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self {
            notification: Notification::error(message),
        }
    }
}



/// A `{value, text}` pair, meant for filling in HTML select fields.
#[derive(Serialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
pub struct SelectOption {
    /// ID of the referenced record.
    #[schema(value_type = String, format = Uuid)]
    pub value: Uuid,

    /// Name of the referenced record.
    pub text: String,
}



#[derive(Serialize, PartialEq, Eq, Clone, Copy, Debug, ToSchema)]
#[cfg_attr(feature = "serde_impls_for_client_on_models", derive(Deserialize))]
#[schema(example = json!({ "count": 42 }))]
pub struct CountResponse {
    pub count: u64,
}
