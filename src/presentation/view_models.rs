//! Field-to-text and field-to-style rules for every dashboard region.
//!
//! Everything here is pure: a payload goes in, display strings and CSS class
//! names come out. Markup assembly lives in [`super::markup`].

use crate::domain::alerts::{Alert, AlertCondition, AlertType};
use crate::domain::market::{
    AnalysisSnapshot, FibonacciLevel, FibonacciLevels, OnchainData, PivotPoints, RealtimeQuote,
    RecentAlert, SupportResistance, Symbol,
};
use crate::time_utils::format_alert_time;

pub const NOT_AVAILABLE: &str = "N/A";
pub const MAX_RECENT_ALERTS: usize = 5;
pub const MAX_PATTERNS: usize = 3;

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;

/// Fixed decimals with `,` thousands grouping: `1234567.891` → `1,234,567.89`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    // rounds to zero → no minus sign
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_number(v, decimals))
}

pub fn format_price(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${}", format_number(v, decimals)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `+1.50%` for zero and up, `-3.20%` below.
pub fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{:.2}%", change.abs())
    } else {
        format!("{:.2}%", change)
    }
}

pub fn change_class(change: f64) -> &'static str {
    if change >= 0.0 { "change-positive" } else { "change-negative" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
    Unavailable,
}

impl RsiZone {
    pub fn classify(rsi: Option<f64>) -> Self {
        match rsi {
            Some(v) if v.is_finite() && v > OVERBOUGHT => RsiZone::Overbought,
            Some(v) if v.is_finite() && v < OVERSOLD => RsiZone::Oversold,
            Some(v) if v.is_finite() => RsiZone::Neutral,
            _ => RsiZone::Unavailable,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RsiZone::Overbought => "rsi-overbought",
            RsiZone::Oversold => "rsi-oversold",
            RsiZone::Neutral => "rsi-neutral",
            RsiZone::Unavailable => "rsi-unavailable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsiZone::Overbought => "Overbought",
            RsiZone::Oversold => "Oversold",
            RsiZone::Neutral => "Neutral",
            RsiZone::Unavailable => NOT_AVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTone {
    Bullish,
    Bearish,
    Neutral,
    Unavailable,
}

impl SignalTone {
    const BULLISH_WORDS: [&'static str; 3] = ["Bullish", "Uptrend", "Oversold"];
    const BEARISH_WORDS: [&'static str; 3] = ["Bearish", "Downtrend", "Overbought"];

    pub fn classify(text: Option<&str>) -> Self {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return SignalTone::Unavailable;
        };
        if Self::BULLISH_WORDS.iter().any(|w| text.contains(w)) {
            SignalTone::Bullish
        } else if Self::BEARISH_WORDS.iter().any(|w| text.contains(w)) {
            SignalTone::Bearish
        } else {
            SignalTone::Neutral
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SignalTone::Bullish => "signal-bullish",
            SignalTone::Bearish => "signal-bearish",
            SignalTone::Neutral => "signal-neutral",
            SignalTone::Unavailable => "signal-unavailable",
        }
    }
}

pub fn alert_state_class(is_active: bool) -> &'static str {
    if is_active { "alert-active" } else { "alert-triggered" }
}

/// A label/value pair with an optional style class for the value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
    pub class: &'static str,
}

impl MetricRow {
    pub fn plain(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into(), class: "" }
    }

    pub fn styled(label: impl Into<String>, value: impl Into<String>, class: &'static str) -> Self {
        Self { label: label.into(), value: value.into(), class }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceCardsView {
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub change_class: &'static str,
    pub volume: String,
    pub bid: String,
    pub ask: String,
    pub rsi: String,
    pub rsi_class: &'static str,
}

impl PriceCardsView {
    pub fn from_quote(quote: &RealtimeQuote, selected: &Symbol) -> Self {
        let change = quote.change_24h.unwrap_or(0.0);
        let rsi = quote.rsi();
        let zone = RsiZone::classify(rsi);
        Self {
            symbol: quote.symbol.clone().unwrap_or_else(|| selected.value().to_string()),
            price: format!("${}", format_number(quote.last_price(), 2)),
            change: format_change(change),
            change_class: change_class(change),
            volume: format!("${}", format_number(quote.volume_24h.unwrap_or(0.0), 2)),
            bid: format_price(quote.bid, 2),
            ask: format_price(quote.ask, 2),
            rsi: match zone {
                RsiZone::Unavailable => NOT_AVAILABLE.to_string(),
                _ => format_optional(rsi, 2),
            },
            rsi_class: zone.css_class(),
        }
    }
}

/// Everything the technical-analysis region shows, grouped by panel.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub heading: String,
    pub indicators: Vec<MetricRow>,
    pub signals: Vec<MetricRow>,
    pub patterns: Vec<String>,
    pub sentiment: Vec<MetricRow>,
    /// `None` when the server reported no on-chain data for the asset.
    pub onchain: Option<Vec<MetricRow>>,
    pub key_levels: Vec<MetricRow>,
    pub support_resistance: Option<Vec<MetricRow>>,
}

impl AnalysisView {
    pub fn from_snapshot(snapshot: &AnalysisSnapshot, selected: &Symbol) -> Self {
        let ti = &snapshot.technical_indicators;
        let zone = RsiZone::classify(ti.rsi);
        let indicators = vec![
            MetricRow::styled("RSI (14)", rsi_text(ti.rsi, zone), zone.css_class()),
            MetricRow::plain("MACD", format_optional(ti.macd_line, 4)),
            MetricRow::plain("SMA 50", format_price(ti.sma50, 2)),
            MetricRow::plain("SMA 200", format_price(ti.sma200, 2)),
        ];

        let trend = snapshot.signals.trend_signal.as_deref();
        let rsi_signal = snapshot.signals.rsi_signal.as_deref();
        let signals = vec![
            MetricRow::styled("Trend", text_or_na(trend), SignalTone::classify(trend).css_class()),
            MetricRow::styled(
                "RSI Signal",
                text_or_na(rsi_signal),
                SignalTone::classify(rsi_signal).css_class(),
            ),
        ];

        let patterns = snapshot
            .signals
            .candlestick_patterns
            .iter()
            .filter(|p| !p.trim().is_empty())
            .take(MAX_PATTERNS)
            .cloned()
            .collect();

        let fg = &snapshot.market_sentiment.fear_and_greed;
        let fear_greed = match (fg.value.as_deref(), fg.classification.as_deref()) {
            (Some(value), Some(class)) => format!("{} ({})", value, class),
            (Some(value), None) => value.to_string(),
            (None, Some(class)) => class.to_string(),
            (None, None) => NOT_AVAILABLE.to_string(),
        };
        let volume = &snapshot.market_sentiment.volume_analysis;
        let volume_tone = SignalTone::classify(volume.volume_status.as_deref());
        let sentiment = vec![
            MetricRow::plain("Fear & Greed", fear_greed),
            MetricRow::styled("Volume", text_or_na(volume.volume_status.as_deref()), volume_tone.css_class()),
            MetricRow::plain(
                "Volume Ratio",
                volume.volume_ratio.map_or_else(|| NOT_AVAILABLE.to_string(), |r| format!("{}x", format_number(r, 2))),
            ),
        ];

        let mut key_levels = snapshot.pivot_points.as_ref().map(pivot_rows).unwrap_or_default();
        key_levels.extend(snapshot.fibonacci_levels.iter().map(fibonacci_row));

        Self {
            heading: snapshot.symbol.clone().unwrap_or_else(|| selected.value().to_string()),
            indicators,
            signals,
            patterns,
            sentiment,
            onchain: snapshot
                .onchain_data
                .as_ref()
                .filter(|data| data.is_available())
                .map(|data| onchain_rows(data, selected)),
            key_levels,
            support_resistance: snapshot
                .support_resistance
                .as_ref()
                .filter(|sr| sr.error.is_none())
                .map(support_resistance_rows),
        }
    }

    /// Finds a row by label in any panel.
    pub fn row(&self, label: &str) -> Option<&MetricRow> {
        self.indicators
            .iter()
            .chain(&self.signals)
            .chain(&self.sentiment)
            .chain(self.onchain.iter().flatten())
            .chain(&self.key_levels)
            .chain(self.support_resistance.iter().flatten())
            .find(|row| row.label == label)
    }
}

fn rsi_text(rsi: Option<f64>, zone: RsiZone) -> String {
    match (rsi, zone) {
        (Some(v), RsiZone::Overbought | RsiZone::Oversold) => format!("{} ({})", format_number(v, 2), zone.label()),
        (Some(v), RsiZone::Neutral) => format_number(v, 2),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn text_or_na(text: Option<&str>) -> String {
    text.filter(|t| !t.trim().is_empty()).unwrap_or(NOT_AVAILABLE).to_string()
}

/// Which metrics are shown depends on the chain: hash rate for Bitcoin, gas
/// for Ethereum, market cap for the rest.
fn onchain_rows(data: &OnchainData, symbol: &Symbol) -> Vec<MetricRow> {
    match symbol.base_asset() {
        "BTC" => vec![
            MetricRow::plain("Hash Rate", format_number(data.network_hash_rate.unwrap_or(0.0), 0)),
            MetricRow::plain(
                "Mempool",
                format!("{} txs", format_number(data.mempool_transactions.unwrap_or(0.0), 0)),
            ),
        ],
        "ETH" => vec![
            MetricRow::plain("Gas (Fast)", format!("{} gwei", format_number(data.fast_gas_price.unwrap_or(0.0), 0))),
            MetricRow::plain("Total Nodes", format_number(data.total_nodes.unwrap_or(0.0), 0)),
        ],
        _ => vec![MetricRow::plain("Market Cap", format!("${}", format_number(data.market_cap.unwrap_or(0.0), 0)))],
    }
}

fn pivot_rows(pivots: &PivotPoints) -> Vec<MetricRow> {
    [
        ("R3", pivots.resistance_3, "level-resistance"),
        ("R2", pivots.resistance_2, "level-resistance"),
        ("R1", pivots.resistance_1, "level-resistance"),
        ("Pivot", pivots.pivot, "level-pivot"),
        ("S1", pivots.support_1, "level-support"),
        ("S2", pivots.support_2, "level-support"),
        ("S3", pivots.support_3, "level-support"),
    ]
    .into_iter()
    .filter(|(_, value, _)| value.is_some())
    .map(|(label, value, class)| MetricRow::styled(label, format_optional(value, 4), class))
    .collect()
}

fn fibonacci_row(level: &FibonacciLevel) -> MetricRow {
    MetricRow::plain(format!("Fib {}%", level.label()), format_number(level.price, 4))
}

fn support_resistance_rows(sr: &SupportResistance) -> Vec<MetricRow> {
    let join = |levels: &[f64]| {
        if levels.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            levels.iter().map(|l| format_number(*l, 4)).collect::<Vec<_>>().join(", ")
        }
    };
    vec![
        MetricRow::styled("Nearest Resistance", format_optional(sr.nearest_resistance, 4), "level-resistance"),
        MetricRow::styled("Nearest Support", format_optional(sr.nearest_support, 4), "level-support"),
        MetricRow::plain("Resistance Levels", join(sr.resistance_levels.as_slice())),
        MetricRow::plain("Support Levels", join(sr.support_levels.as_slice())),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct FibonacciRow {
    pub label: String,
    pub price: String,
    pub nearest: bool,
}

pub fn fibonacci_rows(levels: &FibonacciLevels) -> Vec<FibonacciRow> {
    let nearest = levels.nearest_level.as_deref();
    levels
        .fibonacci_levels
        .iter()
        .map(|level| FibonacciRow {
            label: format!("{}%", level.label()),
            price: format_number(level.price, 4),
            nearest: nearest.is_some_and(|n| n == level.key || n == level.label()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRowView {
    pub id: i64,
    pub symbol: String,
    pub kind: &'static str,
    pub description: String,
    pub created: String,
    pub state_class: &'static str,
    pub state_label: &'static str,
}

impl AlertRowView {
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            id: alert.id,
            symbol: alert.symbol.clone(),
            kind: alert.alert_type.label(),
            description: describe_alert(alert),
            created: alert.created_at.as_deref().map(format_alert_time).unwrap_or_default(),
            state_class: alert_state_class(alert.is_active),
            state_label: if alert.is_active { "Active" } else { "Triggered" },
        }
    }
}

/// `Above $65,000.00`, `Gain 5.00%`, `Spike Above 1,000,000.00`. Rows listed
/// without a threshold show their server message instead.
pub fn describe_alert(alert: &Alert) -> String {
    let threshold = alert.threshold();
    if threshold.is_none() {
        if let Some(message) = alert.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            return message.to_string();
        }
    }
    let condition = alert
        .condition_type
        .as_deref()
        .and_then(|raw| raw.parse::<AlertCondition>().ok())
        .or_else(|| alert.alert_type.conditions().first().copied())
        .or_else(|| alert.alert_type.implicit_condition())
        .map(|c| c.label())
        .unwrap_or_default();
    let threshold = match (alert.alert_type, threshold) {
        (_, None) => NOT_AVAILABLE.to_string(),
        (AlertType::Price, Some(v)) => format!("${}", format_number(v, 2)),
        (AlertType::Percentage, Some(v)) => format!("{}%", format_number(v, 2)),
        (AlertType::Volume, Some(v)) => format_number(v, 2),
    };
    format!("{} {}", condition, threshold).trim().to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentAlertView {
    pub message: String,
    pub time: String,
}

pub fn recent_alert_rows(alerts: &[RecentAlert]) -> Vec<RecentAlertView> {
    alerts
        .iter()
        .take(MAX_RECENT_ALERTS)
        .map(|alert| RecentAlertView {
            message: alert.message.clone().unwrap_or_default(),
            time: alert.timestamp.as_deref().map(format_alert_time).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(999.999, 2), "1,000.00");
        assert_eq!(format_number(-43210.5, 2), "-43,210.50");
        assert_eq!(format_number(0.12345, 4), "0.1235");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(12.0, 0), "12");
        assert_eq!(format_number(f64::NAN, 2), NOT_AVAILABLE);
    }

    #[test]
    fn change_text_and_style() {
        assert_eq!(format_change(1.5), "+1.50%");
        assert_eq!(change_class(1.5), "change-positive");
        assert_eq!(format_change(-3.2), "-3.20%");
        assert_eq!(change_class(-3.2), "change-negative");
        assert_eq!(format_change(0.0), "+0.00%");
        assert_eq!(change_class(0.0), "change-positive");
    }

    #[test]
    fn rsi_zones() {
        assert_eq!(RsiZone::classify(Some(75.0)), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(Some(25.0)), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(Some(50.0)), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(Some(70.0)), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(Some(30.0)), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(None), RsiZone::Unavailable);
        assert_eq!(RsiZone::classify(None).css_class(), "rsi-unavailable");
    }

    #[test]
    fn signal_tones() {
        assert_eq!(SignalTone::classify(Some("Strong Uptrend")), SignalTone::Bullish);
        assert_eq!(SignalTone::classify(Some("Oversold")), SignalTone::Bullish);
        assert_eq!(SignalTone::classify(Some("Bearish crossover")), SignalTone::Bearish);
        assert_eq!(SignalTone::classify(Some("Sideways")), SignalTone::Neutral);
        assert_eq!(SignalTone::classify(Some("  ")), SignalTone::Unavailable);
        assert_eq!(SignalTone::classify(None), SignalTone::Unavailable);
    }

    #[test]
    fn price_card_with_missing_rsi() {
        let quote: RealtimeQuote = serde_json::from_value(json!({
            "symbol": "ETH/USDT", "price": 3150.2, "change_24h": -3.2, "volume_24h": 1250000
        }))
        .unwrap();
        let view = PriceCardsView::from_quote(&quote, &Symbol::default());
        assert_eq!(view.symbol, "ETH/USDT");
        assert_eq!(view.price, "$3,150.20");
        assert_eq!(view.change, "-3.20%");
        assert_eq!(view.change_class, "change-negative");
        assert_eq!(view.volume, "$1,250,000.00");
        assert_eq!(view.bid, NOT_AVAILABLE);
        assert_eq!(view.rsi, NOT_AVAILABLE);
        assert_eq!(view.rsi_class, "rsi-unavailable");
    }

    #[test]
    fn volume_keeps_cents() {
        let quote: RealtimeQuote = serde_json::from_value(json!({ "price": 1.0, "volume_24h": 1234.5 })).unwrap();
        let view = PriceCardsView::from_quote(&quote, &Symbol::default());
        assert_eq!(view.volume, "$1,234.50");
    }

    #[test]
    fn analysis_view_picks_chain_metrics_by_asset() {
        let snapshot: AnalysisSnapshot = serde_json::from_value(json!({
            "technical_indicators": { "rsi": 75.0, "macd_line": 12.345678 },
            "signals": { "trend_signal": "Bullish", "candlestick_patterns": ["Doji", "Hammer", "Engulfing", "Star"] },
            "onchain_data": { "fast_gas_price": 31, "total_nodes": 5800 },
            "pivot_points": { "pivot": 100.0, "support_1": 95.5 }
        }))
        .unwrap();
        let view = AnalysisView::from_snapshot(&snapshot, &Symbol::from("ETH/USDT"));
        assert_eq!(view.row("RSI (14)").unwrap().class, "rsi-overbought");
        assert_eq!(view.row("RSI (14)").unwrap().value, "75.00 (Overbought)");
        assert_eq!(view.row("MACD").unwrap().value, "12.3457");
        assert_eq!(view.row("Trend").unwrap().class, "signal-bullish");
        assert_eq!(view.row("RSI Signal").unwrap().class, "signal-unavailable");
        assert_eq!(view.patterns, vec!["Doji", "Hammer", "Engulfing"]);
        assert_eq!(view.row("Gas (Fast)").unwrap().value, "31 gwei");
        assert!(view.row("Hash Rate").is_none());
        assert_eq!(view.row("S1").unwrap().value, "95.5000");
        assert!(view.row("R1").is_none());
        assert!(view.support_resistance.is_none());
    }

    #[test]
    fn onchain_error_hides_the_panel() {
        let snapshot: AnalysisSnapshot =
            serde_json::from_value(json!({ "onchain_data": { "error": "rate limited" } })).unwrap();
        let view = AnalysisView::from_snapshot(&snapshot, &Symbol::default());
        assert!(view.onchain.is_none());
    }

    #[test]
    fn alert_rows_describe_thresholds() {
        let alert: Alert = serde_json::from_value(json!({
            "id": 3, "symbol": "BTC/USDT", "alert_type": "PRICE", "condition_type": "BELOW",
            "target_price": 60000, "is_active": false, "created_at": "2024-03-05 14:07:00"
        }))
        .unwrap();
        let row = AlertRowView::from_alert(&alert);
        assert_eq!(row.description, "Below $60,000.00");
        assert_eq!(row.state_class, "alert-triggered");
        assert_eq!(row.created, "Mar 5, 02:07 PM");

        let volume: Alert = serde_json::from_value(json!({
            "id": 4, "alert_type": "VOLUME", "target_price": 1500000, "is_active": true
        }))
        .unwrap();
        assert_eq!(describe_alert(&volume), "Spike Above 1,500,000.00");
    }

    #[test]
    fn alert_without_threshold_shows_its_message() {
        let listed: Alert = serde_json::from_value(json!({
            "id": 5, "alert_type": "PERCENTAGE", "condition_type": "GAIN", "target_price": null,
            "message": "BTC/USDT 5.0% change alert", "is_active": true
        }))
        .unwrap();
        assert_eq!(describe_alert(&listed), "BTC/USDT 5.0% change alert");

        let bare: Alert = serde_json::from_value(json!({ "id": 6, "alert_type": "VOLUME", "message": "  " })).unwrap();
        assert_eq!(describe_alert(&bare), "Spike Above N/A");
    }

    #[test]
    fn nearest_fibonacci_level_is_flagged() {
        let levels: FibonacciLevels = serde_json::from_value(json!({
            "fibonacci_levels": { "level_0": 70000.0, "level_61.8": 64000.0 },
            "nearest_level": "level_61.8"
        }))
        .unwrap();
        let rows = fibonacci_rows(&levels);
        assert_eq!(rows[1].label, "61.8%");
        assert_eq!(rows[1].price, "64,000.0000");
        assert!(rows[1].nearest);
        assert!(!rows[0].nearest);
    }

    #[test]
    fn recent_alerts_are_capped() {
        let alerts: Vec<RecentAlert> =
            (0..8).map(|i| RecentAlert { message: Some(format!("m{}", i)), timestamp: None }).collect();
        let rows = recent_alert_rows(&alerts);
        assert_eq!(rows.len(), MAX_RECENT_ALERTS);
        assert_eq!(rows[0].message, "m0");
    }

    #[quickcheck]
    fn change_sign_matches_style(change: f64) -> bool {
        if !change.is_finite() {
            return true;
        }
        let text = format_change(change);
        (text.starts_with('+')) == (change_class(change) == "change-positive")
    }

    #[quickcheck]
    fn grouping_preserves_digits(value: i32) -> bool {
        let formatted = format_number(value as f64, 2);
        let digits: String = formatted.chars().filter(|c| c.is_ascii_digit() || *c == '-').collect();
        digits == format!("{}00", value)
    }
}
