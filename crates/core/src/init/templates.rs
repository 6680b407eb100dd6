//! Embedded template files for .codetest-kit initialization.
//!
//! Uses `rust-embed` to embed the workspace `templates/` directory into the
//! binary at compile time.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// The path is relative to the crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = workspace root `templates/`
///
/// With the `debug-embed` feature, debug builds embed as well instead of
/// reading from disk.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Arguments
/// * `path` - Relative path from templates root (e.g., "config.toml", "samples/python.py")
///
/// # Returns
/// The file content as a String, or None if the file doesn't exist.
///
/// # Example
/// ```
/// use ct_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("archive_timeout_ms"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files under `prefix`, sorted.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_template() {
        let content = get_template("config.toml").expect("config.toml should be embedded");
        assert!(content.contains("generation_url"));
        assert!(content.contains("execution_url"));
        assert!(content.contains("archive_timeout_ms = 310000"));
    }

    #[test]
    fn test_config_template_parses_to_defaults() {
        let content = get_template("config.toml").unwrap();
        let parsed: ct_protocol::config_models::ServiceConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, ct_protocol::config_models::ServiceConfig::default());
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }

    #[test]
    fn test_list_sample_templates() {
        assert_eq!(
            list_templates("samples/"),
            vec![
                "samples/java.java".to_string(),
                "samples/javascript.js".to_string(),
                "samples/python.py".to_string(),
            ]
        );
    }
}
