//! # enroll
//!
//! Command-line host for the `enroll-core` credentialing store.
//!
//! - [`config`]: layered settings (defaults, `enroll.toml`, environment, flags)
//! - [`cli`]: argument parsing and command implementations

pub mod cli;
pub mod config;

use enroll_core::StoreError;
use thiserror::Error;

/// Errors surfaced by the command-line host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The signed-in role may not modify records.
    #[error("Permission denied: {0}")]
    ReadOnly(String),
}
