use std::collections::HashMap;

use crate::domain::alerts::Alert;
use crate::domain::market::{Symbol, Timeframe};

/// What the user is looking at. Read by every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Dark => "bg-gray-900 text-white min-h-screen",
            Theme::Light => "bg-white text-gray-900 min-h-screen",
        }
    }

    /// Icon on the toggle button: the sun switches to light, the moon back.
    pub fn icon_class(self) -> &'static str {
        match self {
            Theme::Dark => "fas fa-sun",
            Theme::Light => "fas fa-moon",
        }
    }
}

/// Independent request sequences. Each one has its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Realtime,
    Analysis,
    Fibonacci,
    SymbolAlerts,
    UserAlerts,
}

/// Issued when a request starts; only the latest ticket of a feed may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub feed: Feed,
    pub generation: u64,
}

/// The single owner of mutable dashboard state.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub selection: Selection,
    pub theme: Theme,
    alerts: Vec<Alert>,
    generations: HashMap<Feed, u64>,
}

impl DashboardState {
    pub fn new(selection: Selection) -> Self {
        Self { selection, ..Self::default() }
    }

    pub fn begin(&mut self, feed: Feed) -> RequestTicket {
        let generation = self.generations.entry(feed).or_insert(0);
        *generation += 1;
        RequestTicket { feed, generation: *generation }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.generations.get(&ticket.feed).copied() == Some(ticket.generation)
    }

    /// The cache is replaced wholesale; the server's order is kept.
    pub fn replace_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_invalidates_older_one() {
        let mut state = DashboardState::default();
        let first = state.begin(Feed::Analysis);
        let second = state.begin(Feed::Analysis);
        assert!(!state.is_current(&first));
        assert!(state.is_current(&second));
    }

    #[test]
    fn feeds_do_not_share_generations() {
        let mut state = DashboardState::default();
        let analysis = state.begin(Feed::Analysis);
        let _realtime = state.begin(Feed::Realtime);
        assert!(state.is_current(&analysis));
    }

    #[test]
    fn theme_toggle_round_trips() {
        let mut state = DashboardState::default();
        assert!(state.theme.is_dark());
        assert_eq!(state.toggle_theme(), Theme::Light);
        assert_eq!(state.theme.icon_class(), "fas fa-moon");
        assert_eq!(state.toggle_theme(), Theme::Dark);
    }
}
