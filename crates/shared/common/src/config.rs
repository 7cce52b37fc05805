//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Base service configuration shared by all services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Log level (used when `RUST_LOG` is not set)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ServiceConfig {
    /// Filter directive for the tracing subscriber.
    pub fn filter_directive(&self) -> String {
        let level = self.log_level.trim();
        if level.is_empty() {
            "info".to_string()
        } else {
            level.to_ascii_lowercase()
        }
    }
}
