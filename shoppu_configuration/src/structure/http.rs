use serde::Deserialize;

use crate::traits::TryResolve;
use crate::HttpConfigurationError;


#[derive(Deserialize, Debug, Clone)]
pub(crate) struct UnresolvedHttpConfiguration {
    host: String,

    port: u16,

    anti_forgery_token: Option<String>,

    verify_anti_forgery_token: Option<bool>,
}


/// Actix HTTP server-related configuration.
#[derive(Debug, Clone)]
pub struct HttpConfiguration {
    /// Host to bind the HTTP server to.
    pub host: String,

    /// Port to bind the HTTP server to.
    pub port: u16,

    /// Token clients must send in the `X-CSRF-Token` header on
    /// mutating requests. If unset, a random token is generated on startup.
    pub anti_forgery_token: Option<String>,

    /// Whether mutating requests are rejected when the
    /// `X-CSRF-Token` header is missing or wrong. Defaults to `true`.
    pub verify_anti_forgery_token: bool,
}


impl TryResolve for UnresolvedHttpConfiguration {
    type Resolved = HttpConfiguration;
    type Error = HttpConfigurationError;

    fn try_resolve(self) -> Result<Self::Resolved, Self::Error> {
        if self.port == 0 {
            return Err(HttpConfigurationError::ZeroPort);
        }

        if matches!(&self.anti_forgery_token, Some(token) if token.trim().is_empty()) {
            return Err(HttpConfigurationError::EmptyAntiForgeryToken);
        }

        Ok(HttpConfiguration {
            host: self.host,
            port: self.port,
            anti_forgery_token: self.anti_forgery_token,
            verify_anti_forgery_token: self.verify_anti_forgery_token.unwrap_or(true),
        })
    }
}
