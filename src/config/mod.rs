//! Runtime configuration.
//!
//! Built once at startup (from CLI flags with environment fallbacks) and
//! shared read-only for the life of the process. Nothing here reads the
//! environment directly, so tests construct configs by hand.

use std::time::Duration;

use crate::consts::{
    DEFAULT_BASE_URL, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_POLL_INTERVAL,
};

/// Environment label that hides error details from HTTP responses.
pub const PRODUCTION: &str = "production";

/// Environment label that enables demo-mode reporting.
pub const DEVELOPMENT: &str = "development";

/// Credentials and cadence for talking to the Coze API.
#[derive(Debug, Clone)]
pub struct CozeConfig {
    pub api_key: String,
    pub workflow_id: String,
    pub base_url: String,
    pub poll: PollConfig,
}

impl CozeConfig {
    pub fn new(api_key: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            workflow_id: workflow_id.into(),
            ..Self::default()
        }
    }

    /// Both credentials present and non-empty.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.workflow_id.is_empty()
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for CozeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            workflow_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: PollConfig::default(),
        }
    }
}

/// Fixed-cadence polling for asynchronous workflow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: PRODUCTION.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
