#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use market_dashboard_wasm::application::DashboardController;
use market_dashboard_wasm::domain::errors::AppError;
use market_dashboard_wasm::domain::state::{Selection, Theme};
use market_dashboard_wasm::infrastructure::http::{ApiClient, ApiRequest, ApiResponse, HttpTransport, Method};
use market_dashboard_wasm::infrastructure::ui::{DashboardView, Notification, Region};

pub const REALTIME: &str = "/api/realtime/BTC/USDT";
pub const ANALYZE: &str = "/api/analyze?symbol=BTC/USDT&timeframe=1d";
pub const FIBONACCI: &str = "/api/fibonacci/BTC/USDT";
pub const RECENT: &str = "/api/alerts/BTC/USDT";
pub const USER_ALERTS: &str = "/api/alerts/user/web_user";

/// Answers from a fixed route table; unknown routes get `200 {}`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    routes: Rc<RefCell<Vec<(Method, String, ApiResponse)>>>,
    seen: Rc<RefCell<Vec<ApiRequest>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.routes.borrow_mut().push((method, path.to_string(), ApiResponse::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.seen.borrow().iter().map(|r| format!("{} {}", r.method.as_str(), r.path)).collect()
    }

    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
    }
}

impl HttpTransport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let reply = self
            .routes
            .borrow()
            .iter()
            .find(|(method, path, _)| *method == request.method && *path == request.path)
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| ApiResponse::new(200, "{}"));
        self.seen.borrow_mut().push(request);
        Ok(reply)
    }
}

/// Holds every request open until the test answers it.
#[derive(Clone, Default)]
pub struct GatedTransport {
    pending: Rc<RefCell<VecDeque<(ApiRequest, oneshot::Sender<Result<ApiResponse, AppError>>)>>>,
}

impl GatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_paths(&self) -> Vec<String> {
        self.pending.borrow().iter().map(|(r, _)| r.path.clone()).collect()
    }

    /// Answers the pending request at `index` (0 = oldest).
    pub fn answer(&self, index: usize, reply: Result<ApiResponse, AppError>) {
        let (_, sender) = self.pending.borrow_mut().remove(index).expect("no such pending request");
        let _ = sender.send(reply);
    }
}

impl HttpTransport for GatedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let (sender, receiver) = oneshot::channel();
        self.pending.borrow_mut().push_back((request, sender));
        receiver.await.unwrap_or_else(|_| Err(AppError::Network("request dropped".into())))
    }
}

#[derive(Default)]
struct ViewLog {
    renders: Vec<(Region, String)>,
    notifications: Vec<Notification>,
    loading: Vec<bool>,
    spinning: Vec<bool>,
    themes: Vec<Theme>,
    forms_cleared: usize,
    confirmations: Vec<String>,
}

/// Records everything the controller asks of the page.
#[derive(Clone)]
pub struct RecordingView {
    log: Rc<RefCell<ViewLog>>,
    confirm_answer: Rc<Cell<bool>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self { log: Rc::default(), confirm_answer: Rc::new(Cell::new(true)) }
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn renders(&self) -> Vec<(Region, String)> {
        self.log.borrow().renders.clone()
    }

    pub fn rendered_regions(&self) -> Vec<Region> {
        self.log.borrow().renders.iter().map(|(region, _)| *region).collect()
    }

    pub fn last_render(&self, region: Region) -> Option<String> {
        self.log.borrow().renders.iter().rev().find(|(r, _)| *r == region).map(|(_, html)| html.clone())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().notifications.clone()
    }

    pub fn loading(&self) -> Vec<bool> {
        self.log.borrow().loading.clone()
    }

    pub fn spinning(&self) -> Vec<bool> {
        self.log.borrow().spinning.clone()
    }

    pub fn themes(&self) -> Vec<Theme> {
        self.log.borrow().themes.clone()
    }

    pub fn forms_cleared(&self) -> usize {
        self.log.borrow().forms_cleared
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.log.borrow().confirmations.clone()
    }

    pub fn reset(&self) {
        *self.log.borrow_mut() = ViewLog::default();
    }
}

impl DashboardView for RecordingView {
    fn render(&self, region: Region, markup: String) {
        self.log.borrow_mut().renders.push((region, markup));
    }

    fn notify(&self, notification: Notification) {
        self.log.borrow_mut().notifications.push(notification);
    }

    fn set_loading(&self, loading: bool) {
        self.log.borrow_mut().loading.push(loading);
    }

    fn set_refresh_spinning(&self, spinning: bool) {
        self.log.borrow_mut().spinning.push(spinning);
    }

    fn apply_theme(&self, theme: Theme) {
        self.log.borrow_mut().themes.push(theme);
    }

    fn clear_alert_form(&self) {
        self.log.borrow_mut().forms_cleared += 1;
    }

    fn confirm(&self, message: &str) -> bool {
        self.log.borrow_mut().confirmations.push(message.to_string());
        self.confirm_answer.get()
    }
}

pub fn controller<T: HttpTransport>(transport: T, view: RecordingView) -> DashboardController<T, RecordingView> {
    DashboardController::new(ApiClient::new(transport, "web_user"), view, Selection::default())
}
