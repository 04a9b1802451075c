use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::PriceError;

// Binance error code for a pair that does not exist.
const INVALID_SYMBOL: i64 = -1121;

/// Anything that can quote the current price of a symbol.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<f64, PriceError>;
}

#[derive(Clone)]
pub struct BinanceClient {
    http: Client,
    base_url: String,
    quote_currency: String,
}

impl BinanceClient {
    pub fn new(base_url: String, quote_currency: String, timeout: Duration) -> Result<Self, PriceError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            quote_currency,
        })
    }

    pub fn pair(&self, symbol: &str) -> String {
        format!("{}{}", symbol.trim().to_uppercase(), self.quote_currency)
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<TickerPrice, PriceError> {
        let pair = self.pair(symbol);
        let url = format!("{}/api/v3/ticker/price", self.base_url);

        let res = self
            .http
            .get(url)
            .query(&[("symbol", pair.as_str())])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();

            if status == StatusCode::BAD_REQUEST {
                if let Ok(err) = serde_json::from_str::<ApiError>(&body) {
                    if err.code == INVALID_SYMBOL {
                        return Err(PriceError::UnknownSymbol {
                            symbol: pair,
                            message: err.msg,
                        });
                    }
                }
            }

            return Err(PriceError::Upstream { status, body });
        }

        let body = res.text().await?;
        serde_json::from_str::<TickerPrice>(&body).map_err(|e| PriceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PriceSource for BinanceClient {
    async fn fetch(&self, symbol: &str) -> Result<f64, PriceError> {
        let ticker = self.ticker_price(symbol).await?;
        ticker.value()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TickerPrice {
    pub symbol: String,
    // decimal string, e.g. "51000.01000000"
    pub price: String,
}

impl TickerPrice {
    pub fn value(&self) -> Result<f64, PriceError> {
        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| PriceError::Parse(format!("`{}` is not a number", self.price)))?;

        if !price.is_finite() || price <= 0.0 {
            return Err(PriceError::Parse(format!("unusable price {price} for {}", self.symbol)));
        }

        Ok(price)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}
