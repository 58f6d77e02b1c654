//! Types and pure computations shared between the Shoppu server,
//! its database layer and its API client.

pub mod api_models;
pub mod currency;
pub mod display;
pub mod id;
pub mod identifier;
pub mod validation;
