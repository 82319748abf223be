//! Voucher numbering.
//!
//! Each tenant keeps one monotonic sequence per voucher type. Numbers look
//! like `RCP-00042`; the sequence value itself is allocated by the database.

use super::types::VoucherType;

/// Zero-padded width of the sequence part.
const SEQUENCE_WIDTH: usize = 5;

/// Prefix used for a voucher type.
const fn prefix(voucher_type: VoucherType) -> &'static str {
    match voucher_type {
        VoucherType::Receipt => "RCP",
        VoucherType::Payment => "PAY",
        VoucherType::Journal => "JV",
    }
}

/// Formats a voucher number from its type and sequence value.
#[must_use]
pub fn format_voucher_number(voucher_type: VoucherType, sequence: u64) -> String {
    format!(
        "{}-{:0width$}",
        prefix(voucher_type),
        sequence,
        width = SEQUENCE_WIDTH
    )
}
