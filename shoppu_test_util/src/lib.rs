pub mod prelude;
mod response;
pub mod sample_categories;
pub mod sample_products;
mod server;
pub use response::*;
pub use server::*;
