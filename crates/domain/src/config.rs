//! Configuration structures
//!
//! Loaded by `frostlink-infra::config` from environment variables or a config
//! file; see that module for the loading strategy.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, SESSION_TTL_SECS};

/// Top-level configuration for the integration core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Login service base URL (e.g. `https://saas.example.com/apps/service`).
    pub service_url: String,
    /// Business gateway base URL (e.g. `https://saas.example.com`).
    pub gateway_url: String,
    /// Platform account used for the credential login.
    pub account: String,
    /// Platform password (already hashed the way the platform expects).
    pub password: String,
    pub tenant: TenantConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Tenant-scoped identifiers carried on every business call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Numeric app identifier used in the open-app exchange path.
    pub app_id: String,
    /// Tenant app name sent in every query body (e.g. `"SnowInventory-82886"`).
    pub app_name: String,
    /// Base URL attachments are served from.
    pub file_base_url: String,
}

/// Transport tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_session_ttl_secs() -> u64 {
    SESSION_TTL_SECS
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}
