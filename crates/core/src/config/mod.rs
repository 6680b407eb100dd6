//! Configuration loading and management.
//!
//! Settings are layered: built-in defaults, then `.codetest-kit/config.toml`,
//! then `CODETEST_*` environment variables. Command-line flags are applied
//! last by the binary.

pub mod error;
pub mod loader;
pub mod models;
