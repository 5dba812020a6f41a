//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivicError {
    #[error("MODEL/{0}")]
    ModelUnavailable(String),

    #[error("INPUT/{0}")]
    InvalidInput(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("RENDER/{0}")]
    Render(String),
}
