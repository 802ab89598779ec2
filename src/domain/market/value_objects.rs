use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

/// Value Object - traded pair such as `BTC/USDT`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, String> {
        if symbol.trim().is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self::from(symbol.as_str()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// `BTC` for `BTC/USDT`; the whole symbol when there is no quote part.
    pub fn base_asset(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        // the API accepts `BTC-USDT` too but always answers with a slash
        Self(value.trim().to_uppercase().replace('-', "/"))
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::from("BTC/USDT")
    }
}

/// Pairs offered by the symbol selector.
pub fn default_symbols() -> Vec<Symbol> {
    ["BTC/USDT", "ETH/USDT", "BNB/USDT", "SOL/USDT", "XRP/USDT", "ADA/USDT"]
        .into_iter()
        .map(Symbol::from)
        .collect()
}

/// Value Object - candle aggregation period used by `/api/analyze`
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Timeframe {
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,

    #[default]
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,

    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    OneWeek,
}

impl Timeframe {
    pub fn as_query_value(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15 Minutes",
            Self::OneHour => "1 Hour",
            Self::FourHours => "4 Hours",
            Self::OneDay => "1 Day",
            Self::OneWeek => "1 Week",
        }
    }

    pub fn all() -> Vec<Timeframe> {
        Self::iter().collect()
    }
}
