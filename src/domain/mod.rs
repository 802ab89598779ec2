pub mod alerts;
pub mod errors;
pub mod logging;
pub mod market;
pub mod state;
