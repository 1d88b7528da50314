//! Error types for Parley

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParleyError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
