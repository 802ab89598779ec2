use crate::domain::errors::AppError;
use crate::domain::market::lenient::{f64_or_none, null_as_default, text_or_none};
use crate::domain::market::Symbol;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

pub const INVALID_VALUE_MESSAGE: &str = "Please enter a valid value";

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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    #[default]
    Price,
    Percentage,
    Volume,
}

impl AlertType {
    /// Conditions the form offers for this type. Volume alerts have no
    /// condition selector, only a threshold.
    pub fn conditions(&self) -> &'static [AlertCondition] {
        match self {
            Self::Price => &[AlertCondition::Above, AlertCondition::Below],
            Self::Percentage => &[AlertCondition::Gain, AlertCondition::Loss],
            Self::Volume => &[],
        }
    }

    /// The condition sent when the form has no selector for this type.
    pub fn implicit_condition(&self) -> Option<AlertCondition> {
        match self {
            Self::Volume => Some(AlertCondition::Spike),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Price => "Price Alert",
            Self::Percentage => "Percentage Change",
            Self::Volume => "Volume Spike",
        }
    }

    pub fn value_placeholder(&self) -> &'static str {
        match self {
            Self::Price => "Target price",
            Self::Percentage => "Change in %",
            Self::Volume => "Volume threshold",
        }
    }

    pub fn all() -> Vec<AlertType> {
        Self::iter().collect()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCondition {
    Above,
    Below,
    Gain,
    Loss,
    Spike,
}

impl AlertCondition {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Above => "Above",
            Self::Below => "Below",
            Self::Gain => "Gain",
            Self::Loss => "Loss",
            Self::Spike => "Spike Above",
        }
    }
}

/// A server-owned alert as listed by `/api/alerts/user/{user_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alert {
    pub id: i64,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "alert_type_or_default")]
    pub alert_type: AlertType,
    #[serde(default, deserialize_with = "text_or_none")]
    pub condition_type: Option<String>,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub target_price: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub percentage_change: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub volume_threshold: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "text_or_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub message: Option<String>,
}

/// `null` or an unrecognised type decodes as the default type.
fn alert_type_or_default<'de, D>(deserializer: D) -> Result<AlertType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = text_or_none(deserializer)?;
    Ok(raw
        .and_then(|text| text.trim().to_ascii_uppercase().parse().ok())
        .unwrap_or_default())
}

impl Alert {
    /// The number the alert watches, when the row carries it. The listing
    /// endpoint only fills `target_price`, and only for `PRICE` alerts, so
    /// percentage and volume rows usually come back without a threshold.
    pub fn threshold(&self) -> Option<f64> {
        let specific = match self.alert_type {
            AlertType::Price => self.target_price,
            AlertType::Percentage => self.percentage_change,
            AlertType::Volume => self.volume_threshold,
        };
        specific.or(self.target_price)
    }
}

/// Raw contents of the create-alert form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertForm {
    pub alert_type: AlertType,
    pub condition: Option<AlertCondition>,
    pub value: String,
}

impl AlertForm {
    pub fn new(alert_type: AlertType, condition: Option<AlertCondition>, value: &str) -> Self {
        Self { alert_type, condition, value: value.to_string() }
    }

    /// Only checks that the value is a non-zero number. A condition that
    /// does not belong to the chosen type falls back to the type's first
    /// option.
    pub fn validate(&self, symbol: &Symbol, user_id: &str) -> Result<NewAlert, AppError> {
        let value = self
            .value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v != 0.0)
            .ok_or_else(|| AppError::Validation(INVALID_VALUE_MESSAGE.to_string()))?;

        let options = self.alert_type.conditions();
        let condition = match self.condition {
            Some(c) if options.contains(&c) => c,
            _ => options
                .first()
                .copied()
                .or_else(|| self.alert_type.implicit_condition())
                .ok_or_else(|| AppError::Validation("Unsupported alert type".to_string()))?,
        };

        Ok(NewAlert {
            symbol: symbol.value().to_string(),
            alert_type: self.alert_type,
            condition,
            value,
            user_id: user_id.to_string(),
        })
    }
}

/// Body of `POST /api/alerts/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlert {
    pub symbol: String,
    pub alert_type: AlertType,
    pub condition: AlertCondition,
    pub value: f64,
    pub user_id: String,
}

/// Body of `DELETE /api/alerts/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertOwner {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn each_type_offers_its_own_conditions() {
        assert_eq!(AlertType::Price.conditions(), &[AlertCondition::Above, AlertCondition::Below]);
        assert_eq!(AlertType::Percentage.conditions(), &[AlertCondition::Gain, AlertCondition::Loss]);
        assert!(AlertType::Volume.conditions().is_empty());
    }

    #[test]
    fn empty_or_zero_values_are_rejected() {
        let symbol = Symbol::default();
        for raw in ["", "   ", "0", "0.0", "abc", "inf", "NaN"] {
            let form = AlertForm::new(AlertType::Price, Some(AlertCondition::Above), raw);
            assert_eq!(
                form.validate(&symbol, "web_user"),
                Err(AppError::Validation(INVALID_VALUE_MESSAGE.to_string())),
                "value {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn negative_values_are_not_range_checked() {
        let form = AlertForm::new(AlertType::Percentage, Some(AlertCondition::Loss), "-5");
        let alert = form.validate(&Symbol::default(), "web_user").unwrap();
        assert_eq!(alert.value, -5.0);
        assert_eq!(alert.condition, AlertCondition::Loss);
    }

    #[test]
    fn volume_alerts_send_spike() {
        let form = AlertForm::new(AlertType::Volume, None, "1500000");
        let alert = form.validate(&Symbol::from("ETH/USDT"), "web_user").unwrap();
        assert_eq!(alert.condition, AlertCondition::Spike);
        assert_eq!(alert.symbol, "ETH/USDT");
    }

    #[test]
    fn mismatched_condition_falls_back_to_first_option() {
        let form = AlertForm::new(AlertType::Percentage, Some(AlertCondition::Above), "3");
        let alert = form.validate(&Symbol::default(), "web_user").unwrap();
        assert_eq!(alert.condition, AlertCondition::Gain);
    }

    #[test]
    fn listing_threshold_falls_back_to_target_price() {
        let alert: Alert = serde_json::from_value(json!({
            "id": 7,
            "symbol": "BTC/USDT",
            "alert_type": "VOLUME",
            "condition_type": "SPIKE",
            "target_price": 2500000.0,
            "is_active": true,
            "created_at": "2024-03-01 12:00:00"
        }))
        .unwrap();
        assert_eq!(alert.threshold(), Some(2_500_000.0));
        assert!(alert.is_active);
    }

    #[test]
    fn odd_alert_types_fall_back_to_price() {
        let rows: Vec<Alert> = serde_json::from_value(json!([
            { "id": 1, "alert_type": null },
            { "id": 2, "alert_type": "RSI" },
            { "id": 3, "alert_type": "volume" },
            { "id": 4 }
        ]))
        .unwrap();
        let types: Vec<AlertType> = rows.iter().map(|a| a.alert_type).collect();
        assert_eq!(types, vec![AlertType::Price, AlertType::Price, AlertType::Volume, AlertType::Price]);
    }

    #[test]
    fn listed_percentage_rows_have_no_threshold() {
        let alert: Alert = serde_json::from_value(json!({
            "id": 7, "alert_type": "PERCENTAGE", "condition_type": "GAIN", "target_price": null,
            "message": "BTC/USDT 5.0% change alert"
        }))
        .unwrap();
        assert_eq!(alert.threshold(), None);
    }
}
