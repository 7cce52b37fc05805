//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified application error handling on top of domain errors
//! - Configuration structures
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, ErrorBody, OptionExt};
pub use telemetry::init_tracing;
