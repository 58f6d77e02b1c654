use shoppu_core::{
    api_models::{Product, SelectOption},
    display::product_display_name,
};
use shoppu_database::entities::{ProductModel, ProductOptionModel};

use crate::api::traits::IntoApiModel;


impl IntoApiModel for ProductModel {
    type ApiModel = Product;

    fn into_api_model(self) -> Self::ApiModel {
        let display_name = product_display_name(self.identifier.as_deref(), &self.name);

        Product {
            id: self.id,
            name: self.name,
            currency: self.currency,
            price: self.price,
            display_name,
            category_id: self.category_id,
            category_name: self.category_name,
            display_currency: self.display_currency,
            display_price: None,
        }
    }
}


impl IntoApiModel for ProductOptionModel {
    type ApiModel = SelectOption;

    fn into_api_model(self) -> Self::ApiModel {
        SelectOption {
            value: self.id.into_uuid(),
            text: self.name,
        }
    }
}
