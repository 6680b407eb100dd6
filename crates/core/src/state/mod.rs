//! Session state.
//!
//! This module provides:
//! - The run state machine
//! - The per-user Session with its mode and language controls
//! - SessionManager for dispatching UI operations

pub mod machine;
pub mod manager;
pub mod session;
