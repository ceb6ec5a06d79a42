use thiserror::Error;
use uuid::Uuid;

use crate::auth::guard::Forbidden;
use crate::auth::ContextError;
use crate::database::manager::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { message: String, field: Option<&'static str> },

    /// Also returned for rows owned by another tenant, so existence never leaks.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    pub fn threshold_not_found(id: Uuid) -> Self {
        ServiceError::NotFound { entity: "Threshold", id }
    }

    pub fn alert_not_found(id: Uuid) -> Self {
        ServiceError::NotFound { entity: "Alert", id }
    }
}

impl From<Forbidden> for ServiceError {
    fn from(err: Forbidden) -> Self {
        ServiceError::Forbidden(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
