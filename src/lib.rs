use leptos::*;
use wasm_bindgen::prelude::*;

#[macro_use]
pub mod macros;

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod global_state;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

use crate::app::{App, WebDashboardView};
use crate::application::{DashboardController, RefreshScheduler};
use crate::config::DashboardConfig;
use crate::domain::logging::{LogComponent, init_logger, init_time_provider};
use crate::domain::state::Selection;
use crate::infrastructure::http::{ApiClient, GlooTransport};
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};
use crate::infrastructure::ui::DashboardView;

/// Entry point: wires logging, mounts the page, starts the refresh timers
/// and kicks off the first load.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let config = DashboardConfig::from_document();
    init_logger(Box::new(ConsoleLogger::new(config.log_level)));
    init_time_provider(Box::new(BrowserTimeProvider::new()));

    let api = ApiClient::new(GlooTransport::new(config.api_base.clone()), config.user_id.clone());
    let controller = DashboardController::new(
        api,
        WebDashboardView::new(config.notification_ttl),
        Selection::default(),
    );
    controller.view().apply_theme(controller.state().theme);

    let app_controller = controller.clone();
    mount_to_body(move || view! { <App controller=app_controller/> });

    RefreshScheduler::start(controller.clone(), &config);
    crate::log_info!(
        LogComponent::Presentation("Initialize"),
        "🚀 Dashboard started (api base: {:?})",
        config.api_base
    );

    spawn_local(async move {
        controller.load_initial_data().await;
    });
}
