use std::cell::RefCell;
use std::time::Duration;

use gloo_timers::callback::Interval;

use crate::config::DashboardConfig;
use crate::domain::logging::LogComponent;
use crate::infrastructure::http::HttpTransport;
use crate::infrastructure::ui::DashboardView;
use crate::log_info;

use super::controller::DashboardController;

thread_local! {
    // Handles must outlive `start`; dropping an Interval cancels it.
    static ACTIVE_INTERVALS: RefCell<Vec<Interval>> = const { RefCell::new(Vec::new()) };
}

/// Periodic jobs. Each tick starts a fresh fetch whether or not the previous
/// one has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTask {
    Realtime,
    Analysis,
}

impl RefreshTask {
    pub fn all() -> [RefreshTask; 2] {
        [RefreshTask::Realtime, RefreshTask::Analysis]
    }

    pub fn period(&self, config: &DashboardConfig) -> Duration {
        match self {
            RefreshTask::Realtime => config.realtime_period,
            RefreshTask::Analysis => config.analysis_period,
        }
    }
}

pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Starts both intervals for the lifetime of the page. Calling it again
    /// adds another set of timers.
    pub fn start<T, V>(controller: DashboardController<T, V>, config: &DashboardConfig)
    where
        T: HttpTransport + 'static,
        V: DashboardView + 'static,
    {
        for task in RefreshTask::all() {
            let period = task.period(config);
            let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
            let controller = controller.clone();
            let interval = Interval::new(millis, move || {
                let controller = controller.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match task {
                        RefreshTask::Realtime => controller.load_realtime_data().await,
                        RefreshTask::Analysis => controller.load_analysis().await,
                    }
                });
            });
            ACTIVE_INTERVALS.with(|intervals| intervals.borrow_mut().push(interval));
            log_info!(
                LogComponent::Application("RefreshScheduler"),
                "⏱️ {:?} refresh every {}s",
                task,
                period.as_secs()
            );
        }
    }

    pub fn active_count() -> usize {
        ACTIVE_INTERVALS.with(|intervals| intervals.borrow().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_come_from_config() {
        let config = DashboardConfig::default();
        assert_eq!(RefreshTask::Realtime.period(&config), Duration::from_secs(30));
        assert_eq!(RefreshTask::Analysis.period(&config), Duration::from_secs(300));
        assert_eq!(RefreshScheduler::active_count(), 0);
    }
}
