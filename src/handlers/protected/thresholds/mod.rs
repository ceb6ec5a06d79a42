// handlers/protected/thresholds/mod.rs - Threshold Catalog endpoints (/sensor-thresholds)

pub mod check;     // POST /sensor-thresholds/check
pub mod crud;      // POST, GET, PUT, DELETE
pub mod lifecycle; // POST /sensor-thresholds/:id/activate|deactivate

pub use check::check;
pub use crud::{create, delete, list, show, update};
pub use lifecycle::{activate, deactivate};
