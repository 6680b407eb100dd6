//! Configuration models.

use ct_protocol::config_models::ServiceConfig;
use std::path::PathBuf;

/// Application configuration after every layer has been applied.
///
/// # Example
///
/// ```rust,no_run
/// use ct_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Generation service at {}", config.service.generation_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Service endpoints and timeouts.
    pub service: ServiceConfig,

    /// The `config.toml` that was read, if one existed.
    pub source: Option<PathBuf>,
}
