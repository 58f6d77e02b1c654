use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::is_valid_currency_code;


/// Reasons a record failed validation.
///
/// The `Display` output is meant to be shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name can't be blank")]
    BlankName,

    #[error("name has already been taken")]
    NameAlreadyTaken,

    #[error("parent category does not exist")]
    ParentCategoryNotFound,

    #[error("a category cannot be its own ancestor")]
    ParentCategoryCycle,

    #[error("category must exist")]
    CategoryNotFound,

    #[error("price must be greater than or equal to 0")]
    NegativePrice,

    #[error("{field} is not a valid currency code: {code}")]
    InvalidCurrencyCode { field: &'static str, code: String },
}


/// Fails if the name is missing or consists only of whitespace.
pub fn validate_name(name: Option<&str>) -> Result<&str, ValidationError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ValidationError::BlankName),
    }
}

/// A missing price is allowed, a negative one is not.
pub fn validate_price(price: Option<Decimal>) -> Result<Option<Decimal>, ValidationError> {
    match price {
        Some(price) if price.is_sign_negative() && !price.is_zero() => {
            Err(ValidationError::NegativePrice)
        }
        _ => Ok(price),
    }
}

pub fn validate_currency_code<'c>(
    field: &'static str,
    code: &'c str,
) -> Result<&'c str, ValidationError> {
    if !is_valid_currency_code(code) {
        return Err(ValidationError::InvalidCurrencyCode {
            field,
            code: code.to_string(),
        });
    }

    Ok(code)
}
