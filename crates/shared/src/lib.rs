//! Shared types, errors, and configuration for Mizan.
//!
//! This crate provides common types used across all other crates:
//! - Rupee amounts with paise precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - The request-boundary error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ComplianceConfig, TenancyConfig};
pub use error::{AppError, AppResult};
