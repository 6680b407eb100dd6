//! # ct-core
//!
//! Core test-orchestration pipeline for codetest-kit.
//!
//! This crate provides:
//! - Configuration loading from the `.codetest-kit/` directory
//! - The language profile registry
//! - Project archive validation
//! - Clients for the AI Generation and Sandbox Execution services
//! - The run state machine and the pipeline controller
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`profiles`]: Per-language sample source and editor metadata
//! - [`upload`]: Project archive validation
//! - [`clients`]: Remote service traits and their HTTP and mock adapters
//! - [`engine`]: Pipeline controller
//! - [`state`]: Run state machine, session and op dispatch
//! - [`init`]: `.codetest-kit/` scaffolding

pub mod clients;
pub mod config;
pub mod engine;
pub mod init;
pub mod profiles;
pub mod state;
pub mod upload;
