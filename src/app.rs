use std::time::Duration;

use gloo_timers::callback::Timeout;
use leptos::*;
use wasm_bindgen::JsCast;

use crate::application::DashboardController;
use crate::domain::{
    alerts::{AlertCondition, AlertForm, AlertType},
    market::{Symbol, Timeframe, default_symbols},
    state::Theme,
};
use crate::global_state::{
    form_alert_type, form_condition, form_value, is_loading, is_refreshing, notifications, region_html,
    selected_symbol, selected_timeframe, theme,
};
use crate::infrastructure::http::GlooTransport;
use crate::infrastructure::ui::{DashboardView, Notification, Region};

pub type WebController = DashboardController<GlooTransport, WebDashboardView>;

/// Bridges controller output into the reactive globals the components read.
pub struct WebDashboardView {
    notification_ttl: Duration,
}

impl WebDashboardView {
    pub fn new(notification_ttl: Duration) -> Self {
        Self { notification_ttl }
    }
}

impl DashboardView for WebDashboardView {
    fn render(&self, region: Region, markup: String) {
        region_html(region).set(markup);
    }

    fn notify(&self, notification: Notification) {
        let mut id = 0;
        notifications().update(|center| id = center.push(notification));
        let millis = u32::try_from(self.notification_ttl.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            notifications().update(|center| {
                center.dismiss(id);
            });
        })
        .forget();
    }

    fn set_loading(&self, loading: bool) {
        is_loading().set(loading);
    }

    fn set_refresh_spinning(&self, spinning: bool) {
        is_refreshing().set(spinning);
    }

    fn apply_theme(&self, next: Theme) {
        theme().set(next);
        if let Some(body) = gloo::utils::document().body() {
            body.set_class_name(next.body_class());
        }
    }

    fn clear_alert_form(&self) {
        form_value().set(String::new());
    }

    fn confirm(&self, message: &str) -> bool {
        gloo::utils::window().confirm_with_message(message).unwrap_or(false)
    }
}

/// Id of the alert whose delete button (or anything inside it) was clicked.
fn clicked_alert_id(ev: &ev::MouseEvent) -> Option<i64> {
    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let button = target.closest("[data-alert-id]").ok()??;
    button.get_attribute("data-alert-id")?.parse().ok()
}

#[component]
pub fn App(controller: WebController) -> impl IntoView {
    view! {
        <div class="dashboard">
            <Header controller=controller.clone()/>
            <section id=Region::PriceCards.element_id() class="price-cards"
                inner_html=move || region_html(Region::PriceCards).get()>
            </section>
            <div class="dashboard-grid">
                <section class="panel panel-wide">
                    <TimeframeBar controller=controller.clone()/>
                    <div id=Region::Analysis.element_id() class="technical-analysis"
                        inner_html=move || region_html(Region::Analysis).get()>
                    </div>
                </section>
                <section class="panel">
                    <h2>"Fibonacci Levels"</h2>
                    <div id=Region::Fibonacci.element_id()
                        inner_html=move || region_html(Region::Fibonacci).get()>
                    </div>
                </section>
                <section class="panel">
                    <h2>"Create Alert"</h2>
                    <AlertFormPanel controller=controller.clone()/>
                </section>
                <section class="panel">
                    <h2>"Active Alerts"</h2>
                    <ActiveAlerts controller=controller.clone()/>
                </section>
                <section class="panel">
                    <h2>"Recent Alerts"</h2>
                    <div id=Region::RecentAlerts.element_id()
                        inner_html=move || region_html(Region::RecentAlerts).get()>
                    </div>
                </section>
            </div>
            <Notifications/>
            <Show when=move || is_loading().get()>
                <div class="loading-overlay">
                    <div class="loading-spinner"></div>
                    <p>"Loading market data..."</p>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn Header(controller: WebController) -> impl IntoView {
    let on_symbol = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            let symbol = Symbol::from(event_target_value(&ev).as_str());
            selected_symbol().set(symbol.clone());
            let controller = controller.clone();
            spawn_local(async move { controller.select_symbol(symbol).await });
        }
    };
    let on_refresh = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn_local(async move {
                controller.refresh_all_data().await;
            });
        }
    };
    let on_analyze = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn_local(async move { controller.load_analysis().await });
        }
    };
    let on_theme = move |_| {
        controller.toggle_theme();
    };

    view! {
        <header class="dashboard-header">
            <h1>"Crypto Analytics Dashboard"</h1>
            <div class="header-controls">
                <select id="symbol-select" on:change=on_symbol>
                    {default_symbols()
                        .into_iter()
                        .map(|symbol| {
                            let value = symbol.value().to_string();
                            let selected = symbol == selected_symbol().get_untracked();
                            view! { <option value=value.clone() selected=selected>{value}</option> }
                        })
                        .collect_view()}
                </select>
                <button id="analyze-btn" class="btn-analyze" on:click=on_analyze>"Analyze"</button>
                <button id="refresh-btn" title="Refresh" on:click=on_refresh>
                    <i class=move || {
                        if is_refreshing().get() { "fas fa-sync-alt fa-spin" } else { "fas fa-sync-alt" }
                    }></i>
                </button>
                <button id="theme-toggle" title="Toggle theme" on:click=on_theme>
                    <i class=move || theme().get().icon_class()></i>
                </button>
            </div>
        </header>
    }
}

#[component]
fn TimeframeBar(controller: WebController) -> impl IntoView {
    view! {
        <div class="timeframe-bar">
            {Timeframe::all()
                .into_iter()
                .map(|tf| {
                    let controller = controller.clone();
                    let on_click = move |_| {
                        selected_timeframe().set(tf);
                        let controller = controller.clone();
                        spawn_local(async move { controller.select_timeframe(tf).await });
                    };
                    view! {
                        <button
                            class=move || {
                                if selected_timeframe().get() == tf { "timeframe-btn active" } else { "timeframe-btn" }
                            }
                            on:click=on_click
                        >
                            {tf.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn AlertFormPanel(controller: WebController) -> impl IntoView {
    let on_type = move |ev: ev::Event| {
        let Ok(alert_type) = event_target_value(&ev).parse::<AlertType>() else {
            return;
        };
        form_alert_type().set(alert_type);
        form_condition().set(WebController::alert_conditions(alert_type).first().copied());
    };
    let on_condition = move |ev: ev::Event| {
        form_condition().set(event_target_value(&ev).parse::<AlertCondition>().ok());
    };
    let on_create = move |_| {
        let form = AlertForm::new(
            form_alert_type().get_untracked(),
            form_condition().get_untracked(),
            &form_value().get_untracked(),
        );
        let controller = controller.clone();
        spawn_local(async move {
            controller.create_alert(&form).await;
        });
    };

    view! {
        <div class="alert-form">
            <select id="alert-type" on:change=on_type>
                {AlertType::all()
                    .into_iter()
                    .map(|t| view! { <option value=t.as_ref().to_string()>{t.label()}</option> })
                    .collect_view()}
            </select>
            <Show when=move || !WebController::alert_conditions(form_alert_type().get()).is_empty()>
                <select id="alert-condition" on:change=on_condition>
                    {move || {
                        WebController::alert_conditions(form_alert_type().get())
                            .iter()
                            .map(|c| {
                                let selected = form_condition().get_untracked() == Some(*c);
                                view! { <option value=c.as_ref().to_string() selected=selected>{c.label()}</option> }
                            })
                            .collect_view()
                    }}
                </select>
            </Show>
            <input
                id="alert-value"
                type="number"
                step="any"
                placeholder=move || form_alert_type().get().value_placeholder()
                prop:value=move || form_value().get()
                on:input=move |ev| form_value().set(event_target_value(&ev))
            />
            <button id="create-alert-btn" class="btn-primary" on:click=on_create>
                "Create Alert"
            </button>
        </div>
    }
}

/// Delete buttons live inside server-rendered markup, so clicks are handled
/// once on the container and matched by `data-alert-id`.
#[component]
fn ActiveAlerts(controller: WebController) -> impl IntoView {
    let on_click = move |ev: ev::MouseEvent| {
        let Some(id) = clicked_alert_id(&ev) else {
            return;
        };
        let controller = controller.clone();
        spawn_local(async move {
            controller.delete_alert(id).await;
        });
    };

    view! {
        <div id=Region::ActiveAlerts.element_id() on:click=on_click
            inner_html=move || region_html(Region::ActiveAlerts).get()>
        </div>
    }
}

#[component]
fn Notifications() -> impl IntoView {
    view! {
        <div class="notifications">
            {move || {
                notifications()
                    .get()
                    .toasts()
                    .iter()
                    .map(|toast| {
                        view! {
                            <div class=toast.notification.kind.css_class()>
                                {toast.notification.message.clone()}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
