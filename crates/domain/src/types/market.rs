//! Market data payloads
//!
//! Quotes, snapshots, bars and candles are live data; requests for them carry
//! cache-bypass headers (see `CachePolicy` in the core pipeline).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_wire_enum_conversions;

/// Candle / bar resolution, sent as the `timeframe` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Timeframe {
    /// `1m`
    OneMinute,
    /// `5m`
    FiveMinutes,
    /// `15m`
    FifteenMinutes,
    /// `1h`
    OneHour,
    /// `1d`
    #[default]
    OneDay,
    /// `1w`
    OneWeek,
}

impl_wire_enum_conversions!(Timeframe {
    OneMinute => "1m",
    FiveMinutes => "5m",
    FifteenMinutes => "15m",
    OneHour => "1h",
    OneDay => "1d",
    OneWeek => "1w",
});

/// Tradable symbol listed by the market endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
}

/// OHLC candle; accepts the short `t/o/h/l/c/v` keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(alias = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "o")]
    pub open: f64,
    #[serde(alias = "h")]
    pub high: f64,
    #[serde(alias = "l")]
    pub low: f64,
    #[serde(alias = "c")]
    pub close: f64,
    #[serde(default, alias = "v")]
    pub volume: Option<f64>,
}

/// Intraday bar; same shape as a candle
pub type Bar = Candle;

/// Latest bid/ask for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(alias = "bidPrice")]
    pub bid: Option<f64>,
    #[serde(alias = "askPrice")]
    pub ask: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Point-in-time summary of a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    #[serde(default, alias = "lastPrice")]
    pub last_price: Option<f64>,
    #[serde(default, alias = "changePercent")]
    pub change_percent: Option<f64>,
    #[serde(default, alias = "latestQuote")]
    pub latest_quote: Option<Quote>,
    #[serde(default, alias = "dailyBar")]
    pub daily_bar: Option<Bar>,
}
