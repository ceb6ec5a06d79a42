pub mod alert;
pub mod severity;
pub mod threshold;

pub use alert::{Alert, AlertStatistics, AlertType};
pub use severity::Severity;
pub use threshold::Threshold;
