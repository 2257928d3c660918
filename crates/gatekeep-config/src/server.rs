//! Listener and log output settings.
//!
//! - `SERVER_ADDR`: socket address to bind (default: `0.0.0.0:3000`)
//! - `LOG_LEVEL`: default level when `RUST_LOG` is unset (default: `info`)
//! - `LOG_FORMAT`: `json` for structured output, anything else for compact text

use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format,
        }
    }
}
