//! Market data as the analytics API reports it: selection value objects and
//! the read-only payloads rendered by the dashboard.

pub mod lenient;
pub mod payloads;
pub mod value_objects;

pub use payloads::*;
pub use value_objects::*;
