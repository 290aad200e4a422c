use std::future::Future;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::future::try_join_all;
use url::Url;

use crate::error::FetchError;
use crate::market::TickerSource;
use crate::model::symbol::TrackedSymbol;

use super::types::RawTicker;

pub const DEFAULT_REST_BASE_URL: &str = "https://data-api.binance.vision";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const TICKER_24HR_PATH: &str = "/api/v3/ticker/24hr";

/// Public market-data client. No keys, no signing.
pub struct BinanceRestClient {
    http: reqwest::Client,
    ticker_url: Url,
}

impl BinanceRestClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .with_context(|| format!("invalid binance base url '{}'", base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!(
                "invalid binance base url '{}': expected http:// or https://",
                base_url
            );
        }
        let ticker_url = base
            .join(TICKER_24HR_PATH)
            .with_context(|| format!("cannot build ticker url from '{}'", base_url))?;
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        tracing::debug!(ticker_url = %ticker_url, "Binance REST client ready");
        Ok(Self { http, ticker_url })
    }

    pub fn ticker_24hr_url(&self, symbol: &str) -> Url {
        let mut url = self.ticker_url.clone();
        url.query_pairs_mut().append_pair("symbol", symbol);
        url
    }

    pub async fn ticker_24hr(&self, symbol: &str) -> Result<RawTicker, FetchError> {
        let url = self.ticker_24hr_url(symbol);
        tracing::debug!(symbol, url = %url, "Requesting 24hr ticker");

        let resp = self.http.get(url).send().await.map_err(|source| {
            tracing::warn!(symbol, error = %source, "Ticker request failed");
            FetchError::Transport {
                symbol: symbol.to_string(),
                source,
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(symbol, status = status.as_u16(), "Ticker request rejected");
            return Err(FetchError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<RawTicker>().await.map_err(|source| {
            tracing::warn!(symbol, error = %source, "Ticker body could not be decoded");
            FetchError::Transport {
                symbol: symbol.to_string(),
                source,
            }
        })
    }

    /// All symbols concurrently, index-aligned with `symbols`. The first failure
    /// aborts the remaining requests.
    pub async fn fetch_tickers(
        &self,
        symbols: &[TrackedSymbol],
    ) -> Result<Vec<RawTicker>, FetchError> {
        try_join_all(symbols.iter().map(|s| self.ticker_24hr(s.external_id))).await
    }
}

impl TickerSource for BinanceRestClient {
    fn fetch_snapshot(
        &self,
        symbols: &[TrackedSymbol],
    ) -> impl Future<Output = Result<Vec<RawTicker>, FetchError>> + Send {
        self.fetch_tickers(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_url_uses_binance_path_and_encodes_symbol() {
        let client =
            BinanceRestClient::new("https://data-api.binance.vision", DEFAULT_REQUEST_TIMEOUT)
                .unwrap();
        assert_eq!(
            client.ticker_24hr_url("BTCUSDT").as_str(),
            "https://data-api.binance.vision/api/v3/ticker/24hr?symbol=BTCUSDT"
        );
        assert_eq!(
            client.ticker_24hr_url("A B").as_str(),
            "https://data-api.binance.vision/api/v3/ticker/24hr?symbol=A+B"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let client =
            BinanceRestClient::new("http://127.0.0.1:8080/", DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert_eq!(
            client.ticker_24hr_url("ETHUSDT").as_str(),
            "http://127.0.0.1:8080/api/v3/ticker/24hr?symbol=ETHUSDT"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(BinanceRestClient::new("ftp://example.com", DEFAULT_REQUEST_TIMEOUT).is_err());
        assert!(BinanceRestClient::new("not a url", DEFAULT_REQUEST_TIMEOUT).is_err());
    }
}
