//! # ps-common
//!
//! Shared configuration and error types for PageSync.

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
