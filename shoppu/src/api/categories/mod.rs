use actix_web::{web, Scope};

mod endpoints;
mod model_impls;

pub use endpoints::*;


/// Router for the `/api/categories` scope.
///
/// `/count` and `/options` are registered before `/{category_id}`,
/// otherwise they would be matched as IDs.
#[rustfmt::skip]
pub fn categories_router() -> Scope {
    web::scope("/categories")
        .service(get_category_count)
        .service(get_category_options)
        .service(get_all_categories)
        .service(create_category)
        .service(get_specific_category)
        .service(update_specific_category)
        .service(delete_specific_category)
}
