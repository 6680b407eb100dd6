//! Configuration loader for the `.codetest-kit/` directory.
//!
//! Only `config.toml` is read from the directory. Missing files fall back to
//! defaults; present but malformed files are errors.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use ct_protocol::config_models::ServiceConfig;
use std::path::Path;
use tracing::debug;

/// Name of the project configuration directory.
pub const CONFIG_DIR: &str = ".codetest-kit";

/// Name of the configuration file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_GENERATION_URL: &str = "CODETEST_GENERATION_URL";
pub const ENV_EXECUTION_URL: &str = "CODETEST_EXECUTION_URL";
pub const ENV_ARCHIVE_TIMEOUT_MS: &str = "CODETEST_ARCHIVE_TIMEOUT_MS";

/// Loads configuration from `root/.codetest-kit/config.toml` and the process
/// environment.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.codetest-kit/` folder
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if any resulting value is unusable.
///
/// # Example
///
/// ```rust,no_run
/// use ct_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Sandbox at {}", config.service.execution_url);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_with(root, |key| std::env::var(key).ok()).await
}

/// Like [`load_config`], with environment lookups served by `lookup`.
pub async fn load_config_with<F>(root: &Path, lookup: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_file(root)?;
    apply_overrides(&mut config.service, lookup)?;
    validate_service(&config.service)?;
    Ok(config)
}

fn load_file(root: &Path) -> ConfigResult<AppConfig> {
    let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let service: ServiceConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    debug!(path = %config_path.display(), "loaded config file");
    Ok(AppConfig {
        service,
        source: Some(config_path),
    })
}

/// Apply `CODETEST_*` overrides. Unset or blank variables are ignored.
pub fn apply_overrides<F>(service: &mut ServiceConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(url) = get(ENV_GENERATION_URL) {
        service.generation_url = url;
    }
    if let Some(url) = get(ENV_EXECUTION_URL) {
        service.execution_url = url;
    }
    if let Some(raw) = get(ENV_ARCHIVE_TIMEOUT_MS) {
        service.archive_timeout_ms = raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: ENV_ARCHIVE_TIMEOUT_MS.to_string(),
            value: raw.clone(),
            reason: "expected a whole number of milliseconds".to_string(),
        })?;
    }
    Ok(())
}

/// Check that the service URLs are http(s) and the timeouts are non-zero.
pub fn validate_service(service: &ServiceConfig) -> ConfigResult<()> {
    check_url("generation_url", &service.generation_url)?;
    check_url("execution_url", &service.execution_url)?;

    let timeouts = [
        ("archive_timeout_ms", Some(service.archive_timeout_ms)),
        ("generation_timeout_ms", service.generation_timeout_ms),
        ("single_run_timeout_ms", service.single_run_timeout_ms),
    ];
    for (key, value) in timeouts {
        if value == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: "0".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
    }
    Ok(())
}

fn check_url(key: &str, value: &str) -> ConfigResult<()> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    let url = reqwest::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(format!("unsupported scheme '{scheme}'"))),
    }
}
