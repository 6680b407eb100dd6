//! Initialization module for creating .codetest-kit directory structures.
//!
//! Generates a `.codetest-kit/` directory with:
//! - Service configuration (`config.toml`)
//! - Optionally, one sample source file per supported language (`samples/`)
//!
//! # Example
//!
//! ```no_run
//! use ct_core::init::{InitOptions, generate_codetest_kit_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     with_samples: true,
//! };
//!
//! let written = generate_codetest_kit_structure(options).await?;
//! println!("Wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_codetest_kit_structure, InitOptions};
pub use templates::{get_template, list_templates};
