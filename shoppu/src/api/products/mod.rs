use actix_web::{web, Scope};

mod endpoints;
mod model_impls;

pub use endpoints::*;


/// Router for the `/api/products` scope.
///
/// `/count` and `/options` are registered before `/{product_id}`,
/// otherwise they would be matched as IDs.
#[rustfmt::skip]
pub fn products_router() -> Scope {
    web::scope("/products")
        .service(get_product_count)
        .service(get_product_options)
        .service(get_all_products)
        .service(create_product)
        .service(get_specific_product)
        .service(update_specific_product)
        .service(delete_specific_product)
}
