mod categories;
mod common;
mod products;

pub use categories::*;
pub use common::*;
pub use products::*;
