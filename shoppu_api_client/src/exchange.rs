//! Exchange rates for showing product prices in their display currency.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use shoppu_core::{api_models::Product, currency::convert_price};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{store::ProductStore, transport::RecordTransport};


/// Default endpoint of the fixer.io API.
pub const FIXER_DEFAULT_ENDPOINT: &str = "https://data.fixer.io/api/latest";


#[derive(Debug, Error)]
pub enum ExchangeRateError {
    #[error("failed to prepare exchange rate URL")]
    UrlPreparationError {
        #[from]
        #[source]
        error: url::ParseError,
    },

    #[error("failed to fetch exchange rates")]
    RequestError {
        #[source]
        error: reqwest::Error,
    },

    #[error("exchange rate provider reported a failure: {}", .reason)]
    ProviderFailure { reason: String },

    #[error("exchange rate provider did not return a rate for {}", .symbol)]
    MissingRate { symbol: String },

    #[error("converted price is out of range")]
    ConversionOverflow,
}


/// Source of current exchange rates.
#[allow(async_fn_in_trait)]
pub trait ExchangeRateProvider {
    /// Returns how many units of `symbol` one unit of `base` is worth.
    async fn latest_rate(&self, base: &str, symbol: &str) -> Result<Decimal, ExchangeRateError>;
}


#[derive(Deserialize)]
struct FixerErrorBody {
    code: Option<u32>,

    #[serde(rename = "type")]
    error_type: Option<String>,

    info: Option<String>,
}

#[derive(Deserialize)]
struct FixerLatestResponse {
    success: bool,

    #[serde(default)]
    rates: HashMap<String, Decimal>,

    error: Option<FixerErrorBody>,
}

impl FixerLatestResponse {
    fn into_rate(self, symbol: &str) -> Result<Decimal, ExchangeRateError> {
        if !self.success {
            let reason = match self.error {
                Some(error) => format!(
                    "{} ({})",
                    error
                        .info
                        .or(error.error_type)
                        .unwrap_or_else(|| "unknown error".to_string()),
                    error.code.unwrap_or_default()
                ),
                None => "unknown error".to_string(),
            };

            return Err(ExchangeRateError::ProviderFailure { reason });
        }

        self.rates
            .get(symbol)
            .copied()
            .ok_or_else(|| ExchangeRateError::MissingRate {
                symbol: symbol.to_string(),
            })
    }
}


/// [`ExchangeRateProvider`] backed by a fixer.io-compatible
/// `latest?access_key=...&base=...&symbols=...` endpoint.
pub struct FixerExchangeRates {
    endpoint: Url,
    access_key: String,
    http_client: reqwest::Client,
}

impl FixerExchangeRates {
    pub fn new<K>(endpoint: Url, access_key: K, http_client: reqwest::Client) -> Self
    where
        K: Into<String>,
    {
        Self {
            endpoint,
            access_key: access_key.into(),
            http_client,
        }
    }

    fn latest_rate_url(&self, base: &str, symbol: &str) -> Url {
        let mut url = self.endpoint.clone();

        url.query_pairs_mut()
            .append_pair("access_key", &self.access_key)
            .append_pair("base", base)
            .append_pair("symbols", symbol);

        url
    }
}

impl ExchangeRateProvider for FixerExchangeRates {
    async fn latest_rate(&self, base: &str, symbol: &str) -> Result<Decimal, ExchangeRateError> {
        let response = self
            .http_client
            .get(self.latest_rate_url(base, symbol))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| ExchangeRateError::RequestError { error })?;

        let latest = response
            .json::<FixerLatestResponse>()
            .await
            .map_err(|error| ExchangeRateError::RequestError { error })?;

        latest.into_rate(symbol)
    }
}


/// Computes `display_price`: equal to `price` if both currencies match
/// (without asking the provider), otherwise the converted price.
/// A product without a price has no display price either.
pub async fn display_price<P>(
    product: &Product,
    provider: &P,
) -> Result<Option<Decimal>, ExchangeRateError>
where
    P: ExchangeRateProvider,
{
    let Some(price) = product.price else {
        return Ok(None);
    };

    if product.currency == product.display_currency {
        return Ok(Some(price));
    }

    let rate = provider
        .latest_rate(&product.currency, &product.display_currency)
        .await?;

    convert_price(price, rate)
        .map(Some)
        .ok_or(ExchangeRateError::ConversionOverflow)
}


impl<T> ProductStore<T>
where
    T: RecordTransport,
{
    /// Fills in the product's `display_price` and selects it.
    ///
    /// If the exchange rate can't be obtained, the failure is logged
    /// and the product is selected without a display price.
    pub async fn apply_exchange_rate<P>(&mut self, mut product: Product, provider: &P)
    where
        P: ExchangeRateProvider,
    {
        match display_price(&product, provider).await {
            Ok(price) => product.display_price = price,
            Err(error) => {
                warn!(
                    error = ?error,
                    base = product.currency.as_str(),
                    symbol = product.display_currency.as_str(),
                    "Failed to apply exchange rate."
                );

                product.display_price = None;
            }
        }

        self.set_selected_item(Some(product));
    }
}



#[cfg(test)]
mod test {
    use std::{cell::Cell, str::FromStr};

    use super::*;
    use crate::store::{test::sample_product, test::ScriptedTransport};


    struct FixedRate {
        rate: Option<Decimal>,
        calls: Cell<usize>,
    }

    impl FixedRate {
        fn new(rate: Option<&str>) -> Self {
            Self {
                rate: rate.map(|rate| Decimal::from_str(rate).unwrap()),
                calls: Cell::new(0),
            }
        }
    }

    impl ExchangeRateProvider for FixedRate {
        async fn latest_rate(&self, _base: &str, symbol: &str) -> Result<Decimal, ExchangeRateError> {
            self.calls.set(self.calls.get() + 1);

            self.rate.ok_or_else(|| ExchangeRateError::MissingRate {
                symbol: symbol.to_string(),
            })
        }
    }

    fn decimal(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }


    #[tokio::test]
    async fn same_currency_needs_no_rate() {
        let provider = FixedRate::new(Some("1.10"));
        let mut store = ProductStore::new(ScriptedTransport::default());

        store
            .apply_exchange_rate(sample_product(1, "Boot", "USD", "USD"), &provider)
            .await;

        assert_eq!(
            store.selected_item().unwrap().display_price,
            Some(decimal("10.00"))
        );
        assert_eq!(provider.calls.get(), 0);
    }

    #[tokio::test]
    async fn differing_currencies_are_converted() {
        let provider = FixedRate::new(Some("1.10"));
        let mut store = ProductStore::new(ScriptedTransport::default());

        store
            .apply_exchange_rate(sample_product(1, "Boot", "EUR", "USD"), &provider)
            .await;

        assert_eq!(
            store.selected_item().unwrap().display_price,
            Some(decimal("11.00"))
        );
        assert_eq!(provider.calls.get(), 1);
    }

    #[tokio::test]
    async fn provider_failure_leaves_display_price_unset() {
        let provider = FixedRate::new(None);
        let mut store = ProductStore::new(ScriptedTransport::default());

        store
            .apply_exchange_rate(sample_product(1, "Boot", "EUR", "USD"), &provider)
            .await;

        let selected = store.selected_item().unwrap();
        assert_eq!(selected.name, "Boot");
        assert_eq!(selected.display_price, None);
    }

    #[tokio::test]
    async fn products_without_a_price_need_no_rate() {
        let provider = FixedRate::new(Some("1.10"));
        let mut store = ProductStore::new(ScriptedTransport::default());

        let mut product = sample_product(1, "Boot", "EUR", "USD");
        product.price = None;

        store.apply_exchange_rate(product, &provider).await;

        assert_eq!(store.selected_item().unwrap().display_price, None);
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn fixer_responses_are_interpreted() {
        let successful: FixerLatestResponse = serde_json::from_str(
            r#"{"success":true,"timestamp":1700000000,"base":"EUR","date":"2023-11-14","rates":{"USD":1.1}}"#,
        )
        .unwrap();
        assert_eq!(successful.into_rate("USD").unwrap(), decimal("1.1"));

        let missing_symbol: FixerLatestResponse =
            serde_json::from_str(r#"{"success":true,"base":"EUR","rates":{"GBP":0.87}}"#).unwrap();
        assert!(matches!(
            missing_symbol.into_rate("USD"),
            Err(ExchangeRateError::MissingRate { .. })
        ));

        let failed: FixerLatestResponse = serde_json::from_str(
            r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"You have not supplied a valid API Access Key."}}"#,
        )
        .unwrap();
        assert!(matches!(
            failed.into_rate("USD"),
            Err(ExchangeRateError::ProviderFailure { .. })
        ));
    }

    #[test]
    fn latest_rate_url_carries_all_parameters() {
        let provider = FixerExchangeRates::new(
            Url::parse(FIXER_DEFAULT_ENDPOINT).unwrap(),
            "secret",
            reqwest::Client::new(),
        );

        assert_eq!(
            provider.latest_rate_url("EUR", "USD").as_str(),
            "https://data.fixer.io/api/latest?access_key=secret&base=EUR&symbols=USD"
        );
    }
}
