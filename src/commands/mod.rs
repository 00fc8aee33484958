pub mod generate;
pub mod match_window;
pub mod status;

use crate::error::{AppError, Result};

/// Single-threaded runtime for the sequential fetch/archive pipeline
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Other(format!("Failed to create async runtime: {}", e)))
}
