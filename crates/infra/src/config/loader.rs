//! Configuration loader
//!
//! Loads platform configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. `FROSTLINK_CONFIG`, when set, names the config file to load
//! 2. Otherwise, attempts to load from environment variables
//! 3. If incomplete, probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FROSTLINK_SERVICE_URL`: Login service base URL
//! - `FROSTLINK_GATEWAY_URL`: Business gateway base URL
//! - `FROSTLINK_ACCOUNT`: Platform account
//! - `FROSTLINK_PASSWORD`: Platform password
//! - `FROSTLINK_APP_ID`: Tenant app identifier
//! - `FROSTLINK_APP_NAME`: Tenant app name
//! - `FROSTLINK_FILE_BASE_URL`: Attachment base URL
//! - `FROSTLINK_HTTP_TIMEOUT_SECS`: Request timeout (optional)
//! - `FROSTLINK_SESSION_TTL_SECS`: Session lifetime (optional)

use std::path::{Path, PathBuf};

use frostlink_domain::{
    FrostlinkError, HttpConfig, PlatformConfig, Result, TenantConfig,
};

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `FrostlinkError::Config` if configuration cannot be loaded from
/// any source, the file format is invalid, or required fields are missing.
pub fn load() -> Result<PlatformConfig> {
    if let Ok(path) = std::env::var("FROSTLINK_CONFIG") {
        return load_from_file(Some(PathBuf::from(path)));
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment configuration incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// All required variables must be present; the two timing knobs fall back to
/// their defaults.
pub fn load_from_env() -> Result<PlatformConfig> {
    let defaults = HttpConfig::default();
    let timeout_secs = env_u64("FROSTLINK_HTTP_TIMEOUT_SECS", defaults.timeout_secs)?;
    let session_ttl_secs = env_u64("FROSTLINK_SESSION_TTL_SECS", defaults.session_ttl_secs)?;

    Ok(PlatformConfig {
        service_url: env_var("FROSTLINK_SERVICE_URL")?,
        gateway_url: env_var("FROSTLINK_GATEWAY_URL")?,
        account: env_var("FROSTLINK_ACCOUNT")?,
        password: env_var("FROSTLINK_PASSWORD")?,
        tenant: TenantConfig {
            app_id: env_var("FROSTLINK_APP_ID")?,
            app_name: env_var("FROSTLINK_APP_NAME")?,
            file_base_url: env_var("FROSTLINK_FILE_BASE_URL")?,
        },
        http: HttpConfig { timeout_secs, session_ttl_secs },
    })
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes multiple locations for config files. Format
/// is detected by file extension (`.json` or `.toml`).
pub fn load_from_file(path: Option<PathBuf>) -> Result<PlatformConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FrostlinkError::config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FrostlinkError::config("no config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FrostlinkError::config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<PlatformConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FrostlinkError::config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FrostlinkError::config(format!("invalid JSON format: {e}"))),
        _ => Err(FrostlinkError::config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe config file locations: working directory first (`config.{json,toml}`,
/// `frostlink.{json,toml}`, up to two parent levels), then relative to the
/// executable. Returns the first file that exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.json", "config.toml", "frostlink.json", "frostlink.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "../", "../../"] {
            candidates.extend(names.iter().map(|name| cwd.join(format!("{prefix}{name}"))));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(names.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| FrostlinkError::config(format!("missing environment variable: {name}")))
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| FrostlinkError::config(format!("invalid value for {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
