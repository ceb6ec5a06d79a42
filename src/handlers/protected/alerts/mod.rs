// handlers/protected/alerts/mod.rs - Alert Lifecycle endpoints (/asset-alerts)

pub mod bulk;    // PATCH resolve-multiple, DELETE delete-multiple
pub mod query;   // list, show, by asset / sensor, active, statistics
pub mod resolve; // PATCH /:id/resolve, DELETE /:id

pub use bulk::{delete_multiple, resolve_multiple, BulkDeleteSummary, BulkResolveSummary};
pub use query::{active, by_asset, by_sensor, list, show, statistics};
pub use resolve::{delete, resolve};
