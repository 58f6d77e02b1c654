//! Shoppu: backend server of a small catalog administration tool.
//!
//! Serves a JSON REST API for categories and products under `/api`
//! (see [`api`]), its OpenAPI document at `/apidocs` and an index page at `/`.

pub mod api;
pub mod cli;
pub mod index;
pub mod logging;
pub mod server;
pub mod state;

#[cfg(feature = "with_test_facilities")]
pub mod testing;
