//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{Money, format_inr, has_minor_unit_precision};
pub use pagination::{PageMeta, PageRequest, PageResponse};
