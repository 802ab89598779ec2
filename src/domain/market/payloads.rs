use super::lenient::{f64_list, f64_or_none, null_as_default, text_list, text_or_none, valid_items, value_as_f64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// `GET /api/realtime/{symbol}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RealtimeQuote {
    #[serde(deserialize_with = "text_or_none")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "f64_or_none")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub close_price: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub change_24h: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub volume_24h: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub bid: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub ask: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub technical_indicators: Option<TechnicalIndicators>,
}

impl RealtimeQuote {
    /// `close_price` wins over `price`; both missing reads as zero.
    pub fn last_price(&self) -> f64 {
        self.close_price.or(self.price).unwrap_or(0.0)
    }

    pub fn rsi(&self) -> Option<f64> {
        self.technical_indicators.as_ref().and_then(|t| t.rsi)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TechnicalIndicators {
    #[serde(deserialize_with = "f64_or_none")]
    pub rsi: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub macd_line: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub sma50: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub sma200: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Signals {
    #[serde(deserialize_with = "text_or_none")]
    pub trend_signal: Option<String>,
    #[serde(deserialize_with = "text_or_none")]
    pub rsi_signal: Option<String>,
    #[serde(deserialize_with = "text_list")]
    pub candlestick_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FearAndGreed {
    #[serde(deserialize_with = "text_or_none")]
    pub value: Option<String>,
    #[serde(deserialize_with = "text_or_none")]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VolumeAnalysis {
    #[serde(deserialize_with = "text_or_none")]
    pub volume_status: Option<String>,
    #[serde(deserialize_with = "f64_or_none")]
    pub volume_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarketSentiment {
    #[serde(deserialize_with = "null_as_default")]
    pub fear_and_greed: FearAndGreed,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_analysis: VolumeAnalysis,
}

/// Chain metrics; which fields are present depends on the asset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OnchainData {
    #[serde(deserialize_with = "text_or_none")]
    pub error: Option<String>,
    #[serde(deserialize_with = "f64_or_none")]
    pub network_hash_rate: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub mempool_transactions: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub fast_gas_price: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub total_nodes: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub market_cap: Option<f64>,
}

impl OnchainData {
    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PivotPoints {
    #[serde(deserialize_with = "f64_or_none")]
    pub pivot: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub resistance_1: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub resistance_2: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub resistance_3: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub support_1: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub support_2: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub support_3: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SupportResistance {
    #[serde(deserialize_with = "text_or_none")]
    pub error: Option<String>,
    #[serde(deserialize_with = "f64_or_none")]
    pub nearest_support: Option<f64>,
    #[serde(deserialize_with = "f64_or_none")]
    pub nearest_resistance: Option<f64>,
    #[serde(deserialize_with = "f64_list")]
    pub support_levels: Vec<f64>,
    #[serde(deserialize_with = "f64_list")]
    pub resistance_levels: Vec<f64>,
}

/// One retracement level, e.g. key `level_61.8` at some price.
#[derive(Debug, Clone, PartialEq)]
pub struct FibonacciLevel {
    pub key: String,
    pub price: f64,
}

impl FibonacciLevel {
    /// `level_61.8` → `61.8`, `level_61_8` → `61.8`
    pub fn label(&self) -> String {
        self.key.strip_prefix("level_").unwrap_or(&self.key).replace('_', ".")
    }

    pub fn ratio(&self) -> Option<f64> {
        self.label().parse::<f64>().ok()
    }
}

/// Decodes the `{name: price}` object into levels ordered by ratio.
/// Keys without a numeric ratio keep their relative order at the end.
pub fn fibonacci_table<'de, D>(deserializer: D) -> Result<Vec<FibonacciLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let mut levels: Vec<FibonacciLevel> = map
        .iter()
        .filter(|(key, _)| key.as_str() != "error")
        .filter_map(|(key, value)| {
            value_as_f64(value).map(|price| FibonacciLevel { key: key.clone(), price })
        })
        .collect();
    levels.sort_by(|a, b| match (a.ratio(), b.ratio()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Ok(levels)
}

/// `GET /api/analyze?symbol=&timeframe=`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSnapshot {
    #[serde(deserialize_with = "text_or_none")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "text_or_none")]
    pub timeframe: Option<String>,
    #[serde(deserialize_with = "f64_or_none")]
    pub close_price: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub technical_indicators: TechnicalIndicators,
    #[serde(deserialize_with = "null_as_default")]
    pub signals: Signals,
    #[serde(deserialize_with = "fibonacci_table")]
    pub fibonacci_levels: Vec<FibonacciLevel>,
    #[serde(deserialize_with = "null_as_default")]
    pub pivot_points: Option<PivotPoints>,
    #[serde(deserialize_with = "null_as_default")]
    pub support_resistance: Option<SupportResistance>,
    #[serde(deserialize_with = "null_as_default")]
    pub market_sentiment: MarketSentiment,
    #[serde(deserialize_with = "null_as_default")]
    pub onchain_data: Option<OnchainData>,
}

/// `GET /api/fibonacci/{symbol}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FibonacciLevels {
    #[serde(deserialize_with = "fibonacci_table")]
    pub fibonacci_levels: Vec<FibonacciLevel>,
    #[serde(deserialize_with = "text_or_none")]
    pub nearest_level: Option<String>,
}

/// An entry of the per-symbol alert history.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecentAlert {
    #[serde(deserialize_with = "text_or_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "text_or_none")]
    pub timestamp: Option<String>,
}

/// `{ "alerts": [...] }` envelope shared by both alert listing endpoints.
/// Rows that fail to decode are skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct AlertList<T> {
    #[serde(default = "Vec::new", deserialize_with = "valid_items")]
    pub alerts: Vec<T>,
}
