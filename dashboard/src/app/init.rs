//! Application initialization error types

use thiserror::Error;

use crate::client::ClientError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(String),
    #[error("Failed to start network runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}
