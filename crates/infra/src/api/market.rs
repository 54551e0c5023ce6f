//! Market data
//!
//! Quotes, snapshots, bars and candles are live data and are always fetched
//! past any HTTP cache.

use bullboard_domain::constants::paths;
use bullboard_domain::{ApiError, Bar, Candle, Quote, Snapshot, SymbolInfo, Timeframe};
use tracing::instrument;
use urlencoding::encode;

use super::client::ApiClient;

/// Market endpoints
#[derive(Clone)]
pub struct MarketApi {
    client: ApiClient,
}

impl MarketApi {
    /// Market endpoints over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Tradable symbols
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn symbols(&self) -> Result<Vec<SymbolInfo>, ApiError> {
        self.client.get(paths::MARKET_SYMBOLS).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: Option<u32>,
    ) -> Result<Vec<Candle>, ApiError> {
        self.client.get(&series_path(paths::MARKET_CANDLES, symbol, timeframe, limit)).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: Option<u32>,
    ) -> Result<Vec<Bar>, ApiError> {
        self.client.get(&series_path(paths::MARKET_BARS, symbol, timeframe, limit)).await
    }

    /// Latest quotes for several symbols in one call
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn quotes(&self, symbols: &[&str]) -> Result<Vec<Quote>, ApiError> {
        let joined = symbols.iter().map(|s| encode(s).into_owned()).collect::<Vec<_>>().join(",");
        self.client.get(&format!("{}?symbols={joined}", paths::MARKET_QUOTES)).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn snapshot(&self, symbol: &str) -> Result<Snapshot, ApiError> {
        self.client.get(&format!("{}/{}", paths::MARKET_SNAPSHOTS, encode(symbol))).await
    }
}

fn series_path(base: &str, symbol: &str, timeframe: Timeframe, limit: Option<u32>) -> String {
    let mut path = format!("{base}?symbol={}&timeframe={timeframe}", encode(symbol));
    if let Some(limit) = limit {
        path.push_str(&format!("&limit={limit}"));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_path_encodes_symbol() {
        assert_eq!(
            series_path(paths::MARKET_CANDLES, "BRK.B", Timeframe::OneHour, Some(50)),
            "/api/v1/market/candles?symbol=BRK.B&timeframe=1h&limit=50"
        );
        assert_eq!(
            series_path(paths::MARKET_BARS, "ETH/USD", Timeframe::default(), None),
            "/api/v1/market/bars?symbol=ETH%2FUSD&timeframe=1d"
        );
    }
}
