//! Core types shared by the access and archive halves of the gate
//!
//! - `GateConfig` / `RuleConfig` - Injected configuration
//! - `AccessError` / `StoreError` / `GateError` - Error types

pub mod config;
pub mod error;

pub use config::{GateConfig, RuleConfig, CATCH_ALL_PATTERN, DEFAULT_DELIMITER};
pub use error::{AccessError, AccessResult, GateError, GateResult, StoreError};
