//! Every user action and timer tick ends up here.
//!
//! The controller owns the dashboard state behind one `Rc<RefCell<_>>` and
//! never keeps a borrow alive across an `.await`, so any number of operations
//! may be in flight at once on the browser's single thread.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::{
    alerts::{AlertCondition, AlertForm, AlertType, INVALID_VALUE_MESSAGE},
    errors::{ApiResult, AppError},
    logging::LogComponent,
    market::{Symbol, Timeframe},
    state::{DashboardState, Feed, RequestTicket, Selection, Theme},
};
use crate::infrastructure::http::{ApiClient, HttpTransport};
use crate::infrastructure::ui::{DashboardView, Notification, Region};
use crate::presentation::markup;
use crate::presentation::view_models::{
    AlertRowView, AnalysisView, PriceCardsView, fibonacci_rows, recent_alert_rows,
};
use crate::{log_debug, log_error, log_info, log_warn};

pub const DASHBOARD_FAILED: &str = "Failed to load dashboard data";
pub const ANALYSIS_FAILED: &str = "Failed to load technical analysis";
pub const REALTIME_FAILED: &str = "Failed to load realtime data";
pub const ALERTS_FAILED: &str = "Failed to load alerts";
pub const CREATE_FAILED: &str = "Failed to create alert";
pub const DELETE_FAILED: &str = "Failed to delete alert";
pub const ALERT_CREATED: &str = "Alert created successfully!";
pub const ALERT_DELETED: &str = "Alert deleted";
pub const DATA_REFRESHED: &str = "Data refreshed successfully!";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this alert?";

const COMPONENT: LogComponent = LogComponent::Application("DashboardController");

pub struct DashboardController<T, V> {
    api: Rc<ApiClient<T>>,
    view: Rc<V>,
    state: Rc<RefCell<DashboardState>>,
}

impl<T, V> Clone for DashboardController<T, V> {
    fn clone(&self) -> Self {
        Self { api: Rc::clone(&self.api), view: Rc::clone(&self.view), state: Rc::clone(&self.state) }
    }
}

impl<T: HttpTransport, V: DashboardView> DashboardController<T, V> {
    pub fn new(api: ApiClient<T>, view: V, selection: Selection) -> Self {
        Self {
            api: Rc::new(api),
            view: Rc::new(view),
            state: Rc::new(RefCell::new(DashboardState::new(selection))),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// A copy of the current state.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    pub fn alert_conditions(alert_type: AlertType) -> &'static [AlertCondition] {
        alert_type.conditions()
    }

    /// Loads every region at once behind the loading overlay. Returns
    /// `false` when price, analysis or user alerts failed; a single
    /// notification is shown for the whole batch in that case.
    pub async fn load_initial_data(&self) -> bool {
        self.view.set_loading(true);
        let (realtime, analysis, alerts, _, _) = futures::join!(
            self.fetch_realtime(),
            self.fetch_analysis(),
            self.fetch_user_alerts(),
            self.load_fibonacci_levels(),
            self.load_recent_alerts()
        );
        self.view.set_loading(false);

        let failures: Vec<&AppError> =
            [&realtime, &analysis, &alerts].into_iter().filter_map(|r| r.as_ref().err()).collect();
        if failures.is_empty() {
            log_info!(COMPONENT, "✅ Dashboard data loaded");
            return true;
        }
        for err in &failures {
            log_error!(COMPONENT, "❌ Initial load failed: {}", err);
        }
        self.view.notify(Notification::error(DASHBOARD_FAILED));
        false
    }

    pub async fn load_analysis(&self) {
        if let Err(err) = self.fetch_analysis().await {
            self.report(&err, ANALYSIS_FAILED);
        }
    }

    pub async fn load_realtime_data(&self) {
        if let Err(err) = self.fetch_realtime().await {
            self.report(&err, REALTIME_FAILED);
        }
    }

    pub async fn load_user_alerts(&self) {
        if let Err(err) = self.fetch_user_alerts().await {
            self.report(&err, ALERTS_FAILED);
        }
    }

    /// Failures only reach the log; the region keeps its previous content.
    pub async fn load_fibonacci_levels(&self) {
        let selection = self.selection();
        let ticket = self.begin(Feed::Fibonacci);
        let result = self.api.fibonacci(&selection.symbol).await;
        if !self.is_current(&ticket) {
            log_debug!(COMPONENT, "Dropping stale fibonacci response for {}", selection.symbol);
            return;
        }
        match result {
            Ok(levels) => self.view.render(Region::Fibonacci, markup::fibonacci(&fibonacci_rows(&levels))),
            Err(err) => {
                log_warn!(COMPONENT, "⚠️ Fibonacci levels unavailable: {}", err);
            }
        }
    }

    /// Failures only reach the log; the region keeps its previous content.
    pub async fn load_recent_alerts(&self) {
        let selection = self.selection();
        let ticket = self.begin(Feed::SymbolAlerts);
        let result = self.api.symbol_alerts(&selection.symbol).await;
        if !self.is_current(&ticket) {
            log_debug!(COMPONENT, "Dropping stale recent alerts for {}", selection.symbol);
            return;
        }
        match result {
            Ok(alerts) => self.view.render(Region::RecentAlerts, markup::recent_alerts(&recent_alert_rows(&alerts))),
            Err(err) => {
                log_warn!(COMPONENT, "⚠️ Recent alerts unavailable: {}", err);
            }
        }
    }

    /// Validates the form locally, then posts it. Returns whether the
    /// server accepted the alert.
    pub async fn create_alert(&self, form: &AlertForm) -> bool {
        let symbol = self.selection().symbol;
        let new_alert = match form.validate(&symbol, self.api.user_id()) {
            Ok(alert) => alert,
            Err(err) => {
                log_warn!(COMPONENT, "Rejected alert form: {}", err);
                self.view.notify(Notification::error(err.user_message(INVALID_VALUE_MESSAGE)));
                return false;
            }
        };

        match self.api.create_alert(&new_alert).await {
            Ok(()) => {
                log_info!(
                    COMPONENT,
                    "✅ Created {} {} alert for {} at {}",
                    new_alert.alert_type,
                    new_alert.condition,
                    new_alert.symbol,
                    new_alert.value
                );
                self.view.notify(Notification::success(ALERT_CREATED));
                self.view.clear_alert_form();
                self.load_user_alerts().await;
                true
            }
            Err(err) => {
                self.report(&err, CREATE_FAILED);
                false
            }
        }
    }

    /// Asks for confirmation first; declining sends nothing.
    pub async fn delete_alert(&self, id: i64) -> bool {
        if !self.view.confirm(CONFIRM_DELETE) {
            log_debug!(COMPONENT, "Delete of alert {} cancelled", id);
            return false;
        }
        match self.api.delete_alert(id).await {
            Ok(()) => {
                log_info!(COMPONENT, "🗑️ Deleted alert {}", id);
                self.view.notify(Notification::success(ALERT_DELETED));
                self.load_user_alerts().await;
                true
            }
            Err(err) => {
                self.report(&err, DELETE_FAILED);
                false
            }
        }
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.state.borrow_mut().toggle_theme();
        log_debug!(COMPONENT, "Theme switched to {:?}", theme);
        self.view.apply_theme(theme);
        theme
    }

    pub async fn refresh_all_data(&self) -> bool {
        self.view.set_refresh_spinning(true);
        let ok = self.load_initial_data().await;
        if ok {
            self.view.notify(Notification::success(DATA_REFRESHED));
        }
        self.view.set_refresh_spinning(false);
        ok
    }

    pub async fn select_symbol(&self, symbol: Symbol) {
        log_info!(COMPONENT, "Symbol changed to {}", symbol);
        self.state.borrow_mut().selection.symbol = symbol;
        self.load_analysis().await;
    }

    pub async fn select_timeframe(&self, timeframe: Timeframe) {
        log_info!(COMPONENT, "Timeframe changed to {}", timeframe);
        self.state.borrow_mut().selection.timeframe = timeframe;
        self.load_analysis().await;
    }

    async fn fetch_realtime(&self) -> ApiResult<()> {
        let selection = self.selection();
        let ticket = self.begin(Feed::Realtime);
        let result = self.api.realtime(&selection.symbol).await;
        if !self.is_current(&ticket) {
            log_debug!(COMPONENT, "Dropping stale realtime response for {}", selection.symbol);
            return Ok(());
        }
        let quote = result?;
        let view = PriceCardsView::from_quote(&quote, &selection.symbol);
        self.view.render(Region::PriceCards, markup::price_cards(&view));
        Ok(())
    }

    async fn fetch_analysis(&self) -> ApiResult<()> {
        let selection = self.selection();
        let ticket = self.begin(Feed::Analysis);
        let result = self.api.analyze(&selection.symbol, selection.timeframe).await;
        if !self.is_current(&ticket) {
            log_debug!(
                COMPONENT,
                "Dropping stale analysis for {} {}",
                selection.symbol,
                selection.timeframe
            );
            return Ok(());
        }
        let snapshot = result?;
        let view = AnalysisView::from_snapshot(&snapshot, &selection.symbol);
        self.view.render(Region::Analysis, markup::analysis(&view));
        Ok(())
    }

    async fn fetch_user_alerts(&self) -> ApiResult<()> {
        let ticket = self.begin(Feed::UserAlerts);
        let result = self.api.user_alerts().await;
        if !self.is_current(&ticket) {
            log_debug!(COMPONENT, "Dropping stale user alert list");
            return Ok(());
        }
        let alerts = result?;
        let rows: Vec<AlertRowView> = alerts.iter().map(AlertRowView::from_alert).collect();
        self.state.borrow_mut().replace_alerts(alerts);
        self.view.render(Region::ActiveAlerts, markup::active_alerts(&rows));
        Ok(())
    }

    fn begin(&self, feed: Feed) -> RequestTicket {
        self.state.borrow_mut().begin(feed)
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.state.borrow().is_current(ticket)
    }

    fn report(&self, err: &AppError, fallback: &str) {
        log_error!(COMPONENT, "❌ {}: {}", fallback, err);
        self.view.notify(Notification::error(err.user_message(fallback)));
    }
}
