//! Read-only reports derived from posted vouchers.
//!
//! - Day Book
//! - Trial Balance
//! - Account Statement

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
