//! Cross-site request forgery protection for mutating endpoints.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use tracing::{debug, warn};

use super::errors::EndpointError;
use crate::state::ApplicationState;


/// Name of the header mutating requests must carry the anti-forgery token in.
pub const ANTI_FORGERY_TOKEN_HEADER_NAME: &str = "X-CSRF-Token";


/// An extractor that only succeeds when the request carries the server's
/// anti-forgery token in the [`X-CSRF-Token`][ANTI_FORGERY_TOKEN_HEADER_NAME] header.
///
/// Add it as a parameter of any endpoint that modifies data. When verification
/// is turned off in the configuration, it always succeeds.
///
/// # Example
/// ```no_run
/// # use actix_web::post;
/// # use shoppu::api::anti_forgery::VerifiedAntiForgeryToken;
/// # use shoppu::api::errors::EndpointResult;
/// #[post("")]
/// async fn some_mutating_endpoint(
///     _anti_forgery_token: VerifiedAntiForgeryToken,
/// ) -> EndpointResult {
///     // ...
///     # todo!();
/// }
/// ```
pub struct VerifiedAntiForgeryToken;

impl FromRequest for VerifiedAntiForgeryToken {
    type Error = EndpointError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<ApplicationState>() else {
            return ready(Err(EndpointError::internal_error_with_reason(
                "application state is not registered",
            )));
        };

        if !state.configuration.http.verify_anti_forgery_token {
            return ready(Ok(Self));
        }


        let provided_token = req
            .headers()
            .get(ANTI_FORGERY_TOKEN_HEADER_NAME)
            .and_then(|header_value| header_value.to_str().ok());

        match provided_token {
            Some(token) if token == state.anti_forgery_token => ready(Ok(Self)),
            Some(_) => {
                warn!(
                    path = req.path(),
                    "Rejecting request with a mismatched anti-forgery token."
                );

                ready(Err(EndpointError::InvalidAntiForgeryToken))
            }
            None => {
                debug!(
                    path = req.path(),
                    "Rejecting request without an anti-forgery token."
                );

                ready(Err(EndpointError::InvalidAntiForgeryToken))
            }
        }
    }
}



#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use actix_web::{test::TestRequest, web::Data};
    use shoppu_configuration::Configuration;
    use shoppu_database::establish_in_memory_database;

    use super::*;
    use crate::state::ApplicationStateInner;

    async fn state_with(verify_anti_forgery_token: bool) -> ApplicationState {
        let configuration = Configuration::load_from_str(
            &format!(
                r#"
                [logging]
                console_output_level_filter = "info"
                log_file_output_level_filter = "info"
                log_file_output_directory = "./data/logs"

                [http]
                host = "127.0.0.1"
                port = 3000
                anti_forgery_token = "expected-token"
                verify_anti_forgery_token = {}

                [database]
                url = "sqlite::memory:"
                "#,
                verify_anti_forgery_token
            ),
            PathBuf::from("test.toml"),
        )
        .unwrap();

        let database_pool = establish_in_memory_database().await.unwrap();

        Data::new(ApplicationStateInner::with_database_pool(
            configuration,
            database_pool,
        ))
    }

    async fn extract(request: TestRequest) -> Result<VerifiedAntiForgeryToken, EndpointError> {
        let (request, mut payload) = request.to_http_parts();
        VerifiedAntiForgeryToken::from_request(&request, &mut payload).await
    }

    #[actix_web::test]
    async fn only_the_server_token_is_accepted() {
        let state = state_with(true).await;

        let accepted = extract(
            TestRequest::post()
                .app_data(state.clone())
                .insert_header((ANTI_FORGERY_TOKEN_HEADER_NAME, "expected-token")),
        )
        .await;
        assert!(accepted.is_ok());

        let forged = extract(
            TestRequest::post()
                .app_data(state.clone())
                .insert_header((ANTI_FORGERY_TOKEN_HEADER_NAME, "forged-token")),
        )
        .await;
        assert!(matches!(forged, Err(EndpointError::InvalidAntiForgeryToken)));

        let missing = extract(TestRequest::post().app_data(state)).await;
        assert!(matches!(missing, Err(EndpointError::InvalidAntiForgeryToken)));
    }

    #[actix_web::test]
    async fn disabled_verification_accepts_everything() {
        let state = state_with(false).await;

        let accepted = extract(TestRequest::post().app_data(state)).await;
        assert!(accepted.is_ok());
    }
}
