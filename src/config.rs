use std::time::Duration;

use crate::domain::logging::LogLevel;

/// Runtime knobs. Everything has a default matching the stock deployment
/// (dashboard served by the API host itself).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Prefix for every API path; empty means same origin.
    pub api_base: String,
    /// Fixed identity used for alert ownership.
    pub user_id: String,
    pub realtime_period: Duration,
    pub analysis_period: Duration,
    /// How long a notification stays on screen.
    pub notification_ttl: Duration,
    pub log_level: LogLevel,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            user_id: "web_user".to_string(),
            realtime_period: Duration::from_secs(30),
            analysis_period: Duration::from_secs(5 * 60),
            notification_ttl: Duration::from_secs(3),
            log_level: if cfg!(debug_assertions) { LogLevel::Debug } else { LogLevel::Info },
        }
    }
}

impl DashboardConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Reads `data-api-base` from the `<body>` element when present.
    pub fn from_document() -> Self {
        let base = gloo::utils::document()
            .body()
            .and_then(|body| body.get_attribute("data-api-base"));
        match base {
            Some(base) => Self::default().with_api_base(base),
            None => Self::default(),
        }
    }
}
