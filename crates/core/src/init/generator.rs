//! Directory structure and file generation for .codetest-kit initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::{CONFIG_DIR, CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a .codetest-kit directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .codetest-kit will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing .codetest-kit directory.
    pub force: bool,

    /// Also write one sample source file per supported language.
    pub with_samples: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            with_samples: false,
        }
    }
}

/// Generate a .codetest-kit directory.
///
/// This function creates the following structure:
/// ```text
/// .codetest-kit/
/// ├── config.toml
/// └── samples/            (with_samples only)
///     ├── java.java
///     ├── javascript.js
///     └── python.py
/// ```
///
/// # Arguments
/// * `options` - Configuration for the initialization process
///
/// # Returns
/// The paths of every file written, or an `InitError` if:
/// - The .codetest-kit directory already exists (without force flag)
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_codetest_kit_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let ct_dir = options.target_dir.join(CONFIG_DIR);

    if ct_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(ct_dir));
    }

    fs::create_dir_all(&ct_dir).map_err(|source| InitError::DirectoryCreate {
        path: ct_dir.clone(),
        source,
    })?;

    let mut written = vec![write_template_file(&ct_dir, CONFIG_FILE)?];

    if options.with_samples {
        for sample_path in list_templates("samples/") {
            written.push(write_template_file(&ct_dir, &sample_path)?);
        }
    }

    Ok(written)
}

/// Write one embedded template below `ct_dir`, creating parent directories.
fn write_template_file(ct_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = ct_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}
