//! # ct-protocol
//!
//! Core protocol definitions and data models for codetest-kit.
//!
//! This crate defines all shared data structures used for:
//! - Language profiles and workflow modes
//! - Run results and stage errors shown to the user
//! - Request/response bodies of the generation and sandbox services
//! - Inter-process communication between a UI and the Core
//!
//! ## Modules
//!
//! - [`language_models`]: Supported languages, modes and language profiles
//! - [`run_models`]: Pipeline outcomes, errors and run status
//! - [`wire_models`]: HTTP bodies exchanged with the remote services
//! - [`config_models`]: Service endpoints and timeouts from config.toml
//! - [`ipc`]: Operations and Events for UI-Core communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, uuid and chrono
//! - TypeScript generation: All types derive `TS` for web client compatibility
//! - Independent compilation: No dependencies on other codetest-kit crates

pub mod config_models;
pub mod ipc;
pub mod language_models;
pub mod run_models;
pub mod wire_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use language_models::*;
pub use run_models::*;
pub use wire_models::*;
