use rust_decimal::Decimal;


/// Currency both `currency` and `display_currency` default to.
pub const DEFAULT_CURRENCY: &str = "EUR";


/// Converts `price` with the given exchange `rate`, truncating
/// (not rounding) the result to two decimal places:
/// `floor(price * rate * 100) / 100`.
///
/// Returns `None` if the intermediate values overflow.
pub fn convert_price(price: Decimal, rate: Decimal) -> Option<Decimal> {
    let hundred = Decimal::ONE_HUNDRED;

    let scaled = price.checked_mul(rate)?.checked_mul(hundred)?;
    let mut converted = scaled.floor().checked_div(hundred)?;
    converted.rescale(2);

    Some(converted)
}


/// Returns `true` for ISO-4217-shaped codes (three ASCII uppercase letters).
pub fn is_valid_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|character| character.is_ascii_uppercase())
}
