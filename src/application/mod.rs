pub mod controller;
pub mod scheduler;

pub use controller::DashboardController;
pub use scheduler::{RefreshScheduler, RefreshTask};
