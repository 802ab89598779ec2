//! The seam between the controller and whatever shows the dashboard.
//!
//! The browser implementation lives in `app::WebDashboardView`; tests use a
//! recording implementation so the controller runs without a DOM.

use crate::domain::state::Theme;
use strum::{AsRefStr, EnumIter, IntoStaticStr};

/// Named display areas of the page. Each render replaces the whole area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, IntoStaticStr)]
pub enum Region {
    #[strum(serialize = "price-cards")]
    PriceCards,
    #[strum(serialize = "technical-analysis")]
    Analysis,
    #[strum(serialize = "fibonacci-levels")]
    Fibonacci,
    #[strum(serialize = "active-alerts")]
    ActiveAlerts,
    #[strum(serialize = "recent-alerts")]
    RecentAlerts,
}

impl Region {
    pub fn element_id(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification notification-success",
            NotificationKind::Error => "notification notification-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, message: message.into() }
    }
}

/// Everything the controller may do to the page.
pub trait DashboardView {
    /// Replace the full markup of `region`.
    fn render(&self, region: Region, markup: String);
    /// Show a transient message; the view dismisses it on its own.
    fn notify(&self, notification: Notification);
    fn set_loading(&self, loading: bool);
    fn set_refresh_spinning(&self, spinning: bool);
    fn apply_theme(&self, theme: Theme);
    fn clear_alert_form(&self);
    /// Blocking yes/no question; `false` means the user declined.
    fn confirm(&self, message: &str) -> bool;
}
