//! Care service configuration.

use std::env;

use common::ServiceConfig;

/// Care service configuration.
#[derive(Debug, Clone)]
pub struct CareServiceConfig {
    /// Logging and tracing settings
    pub service: ServiceConfig,
}

impl CareServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            service: ServiceConfig {
                service_name: env::var("CARE_SERVICE_NAME")
                    .unwrap_or_else(|_| "care-service".to_string()),
                log_level: env::var("CARE_SERVICE_LOG_LEVEL")
                    .or_else(|_| env::var("LOG_LEVEL"))
                    .unwrap_or_else(|_| "info".to_string()),
                json_logs: env::var("CARE_SERVICE_LOG_JSON")
                    .ok()
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
            },
        }
    }

    /// Raise the log level to `debug` unless a more verbose one is set.
    pub fn verbose(mut self) -> Self {
        if !self.service.filter_directive().starts_with("trace") {
            self.service.log_level = "debug".to_string();
        }
        self
    }
}

impl Default for CareServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "care-service".to_string(),
                ..Default::default()
            },
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
