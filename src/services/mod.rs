pub mod alert_service;
pub mod batch;
pub mod check;
pub mod error;
pub mod evaluator;
pub mod threshold_service;

pub use alert_service::{AlertService, SensorRef};
pub use batch::{BatchFailure, BatchResult};
pub use check::{check_reading, CheckOutcome, ReadingCheck};
pub use error::{ServiceError, ServiceResult};
pub use evaluator::{evaluate, BreachDirection, BreachResult};
pub use threshold_service::{CreateThreshold, ThresholdService, UpdateThreshold};
