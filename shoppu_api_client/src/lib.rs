//! A client for the Shoppu API.
//!
//! - [`transport`] performs the HTTP requests ([`transport::RestTransport`]),
//! - [`store`] mirrors records fetched through a transport
//!   ([`store::CategoryStore`], [`store::ProductStore`]),
//! - [`exchange`] provides exchange rates for showing product prices in another currency,
//! - [`ui`] holds the non-presentational state of the admin interface
//!   (notification queue, pagination, selected module and action).

pub mod exchange;
pub mod store;
pub mod transport;
pub mod ui;
