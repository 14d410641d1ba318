use anyhow::Error;
use thiserror::Error;

use crate::models::ScaleId;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Message(String),
    #[error("missing scale in risk result: {}", .0.key())]
    MissingScale(ScaleId),
    #[error("{0}")]
    Service(String),
    #[error(transparent)]
    Other(#[from] Error),
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}
