use leptos::*;
use once_cell::sync::OnceCell;

use crate::domain::alerts::{AlertCondition, AlertType};
use crate::domain::market::{Symbol, Timeframe};
use crate::domain::state::Theme;
use crate::infrastructure::ui::Region;
use crate::presentation::NotificationCenter;

/// Reactive mirror of what the page shows. The controller writes through
/// `WebDashboardView`; components only read.
pub struct Globals {
    pub price_cards_html: RwSignal<String>,
    pub analysis_html: RwSignal<String>,
    pub fibonacci_html: RwSignal<String>,
    pub active_alerts_html: RwSignal<String>,
    pub recent_alerts_html: RwSignal<String>,
    pub is_loading: RwSignal<bool>,
    pub is_refreshing: RwSignal<bool>,
    pub theme: RwSignal<Theme>,
    pub notifications: RwSignal<NotificationCenter>,
    pub selected_symbol: RwSignal<Symbol>,
    pub selected_timeframe: RwSignal<Timeframe>,
    pub form_alert_type: RwSignal<AlertType>,
    pub form_condition: RwSignal<Option<AlertCondition>>,
    pub form_value: RwSignal<String>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        price_cards_html: create_rw_signal(String::new()),
        analysis_html: create_rw_signal(String::new()),
        fibonacci_html: create_rw_signal(String::new()),
        active_alerts_html: create_rw_signal(String::new()),
        recent_alerts_html: create_rw_signal(String::new()),
        is_loading: create_rw_signal(false),
        is_refreshing: create_rw_signal(false),
        theme: create_rw_signal(Theme::default()),
        notifications: create_rw_signal(NotificationCenter::new()),
        selected_symbol: create_rw_signal(Symbol::default()),
        selected_timeframe: create_rw_signal(Timeframe::default()),
        form_alert_type: create_rw_signal(AlertType::default()),
        form_condition: create_rw_signal(AlertType::default().conditions().first().copied()),
        form_value: create_rw_signal(String::new()),
    })
}

/// The markup signal backing one region.
pub fn region_html(region: Region) -> RwSignal<String> {
    let g = globals();
    match region {
        Region::PriceCards => g.price_cards_html,
        Region::Analysis => g.analysis_html,
        Region::Fibonacci => g.fibonacci_html,
        Region::ActiveAlerts => g.active_alerts_html,
        Region::RecentAlerts => g.recent_alerts_html,
    }
}

crate::global_signals! {
    pub is_loading => is_loading: bool,
    pub is_refreshing => is_refreshing: bool,
    pub theme => theme: Theme,
    pub notifications => notifications: NotificationCenter,
    pub selected_symbol => selected_symbol: Symbol,
    pub selected_timeframe => selected_timeframe: Timeframe,
    pub form_alert_type => form_alert_type: AlertType,
    pub form_condition => form_condition: Option<AlertCondition>,
    pub form_value => form_value: String,
}
