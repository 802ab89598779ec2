pub mod markup;
pub mod notifications;
pub mod view_models;

pub use notifications::NotificationCenter;
