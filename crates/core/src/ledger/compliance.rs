//! Fund-compliance rules for vouchers.
//!
//! Two rules are enforced before a voucher is persisted:
//! - restricted funds (Zakat, Sadaqah) never pay for operational expenses
//! - receipts above the PAN threshold must identify the donor's PAN

use mizan_shared::ComplianceConfig;
use mizan_shared::types::format_inr;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{FundType, JournalEntryHeader, VoucherType};

/// A violated compliance rule. Messages are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplianceViolation {
    /// Restricted money used for an operational expense.
    #[error(
        "Restricted funds (Zakat/Sadaqah) cannot fund operational expenses (found '{keyword}' on a {fund} ledger)"
    )]
    RestrictedFundMisuse {
        /// The forbidden keyword that matched.
        keyword: String,
        /// The restricted fund involved.
        fund: FundType,
    },

    /// Receipt above threshold without PAN.
    #[error("PAN number is mandatory for donations exceeding {}", rupees(.threshold))]
    PanRequired {
        /// Receipt amount.
        amount: Decimal,
        /// Configured threshold.
        threshold: Decimal,
    },

    /// PAN present but malformed.
    #[error("Invalid PAN '{0}': expected 5 letters, 4 digits and a letter (e.g. ABCDE1234F)")]
    InvalidPan(String),
}

fn rupees(amount: &Decimal) -> String {
    format_inr(*amount)
}

impl ComplianceViolation {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RestrictedFundMisuse { .. } => "RESTRICTED_FUND_MISUSE",
            Self::PanRequired { .. } => "PAN_REQUIRED",
            Self::InvalidPan(_) => "INVALID_PAN",
        }
    }
}

/// Configured compliance rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRules {
    restricted_keywords: Vec<String>,
    pan_threshold: Decimal,
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self::from_config(&ComplianceConfig::default())
    }
}

impl ComplianceRules {
    /// Builds rules from configuration. Keywords are matched case-insensitively.
    #[must_use]
    pub fn from_config(config: &ComplianceConfig) -> Self {
        Self::new(
            config.restricted_keywords.iter().map(String::as_str),
            config.pan_threshold,
        )
    }

    /// Builds rules from a keyword list and PAN threshold.
    #[must_use]
    pub fn new<'a>(keywords: impl IntoIterator<Item = &'a str>, pan_threshold: Decimal) -> Self {
        let restricted_keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            restricted_keywords,
            pan_threshold,
        }
    }

    /// Receipts above this amount require a PAN.
    #[must_use]
    pub const fn pan_threshold(&self) -> Decimal {
        self.pan_threshold
    }

    /// Runs every rule against a voucher.
    ///
    /// `funds` holds the fund tag of each ledger the voucher touches, and
    /// `texts` any additional free text (line particulars) to scan.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn check<'a>(
        &self,
        header: &JournalEntryHeader,
        amount: Decimal,
        funds: &[Option<FundType>],
        texts: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ComplianceViolation> {
        if header.voucher_type == VoucherType::Payment {
            self.check_restricted_funds(&header.narration, funds, texts)?;
        }
        if header.voucher_type == VoucherType::Receipt {
            self.check_pan(amount, header.donor_pan.as_deref())?;
        }
        Ok(())
    }

    /// Restricted-fund misuse rule for payments.
    ///
    /// # Errors
    ///
    /// Returns `RestrictedFundMisuse` if a restricted ledger is involved and
    /// the narration or any particulars mention an operational keyword.
    pub fn check_restricted_funds<'a>(
        &self,
        narration: &str,
        funds: &[Option<FundType>],
        texts: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ComplianceViolation> {
        let Some(fund) = funds.iter().flatten().copied().find(|f| f.is_restricted()) else {
            return Ok(());
        };

        let mut haystack = vec![narration.to_lowercase()];
        haystack.extend(texts.into_iter().map(str::to_lowercase));

        for keyword in &self.restricted_keywords {
            if haystack.iter().any(|text| text.contains(keyword.as_str())) {
                return Err(ComplianceViolation::RestrictedFundMisuse {
                    keyword: keyword.clone(),
                    fund,
                });
            }
        }
        Ok(())
    }

    /// Donation PAN rule for receipts.
    ///
    /// # Errors
    ///
    /// Returns `PanRequired` when the amount exceeds the threshold and no PAN
    /// was given.
    pub fn check_pan(&self, amount: Decimal, donor_pan: Option<&str>) -> Result<(), ComplianceViolation> {
        let blank = donor_pan.is_none_or(|p| p.trim().is_empty());
        if amount > self.pan_threshold && blank {
            return Err(ComplianceViolation::PanRequired {
                amount,
                threshold: self.pan_threshold,
            });
        }
        Ok(())
    }
}

/// Normalizes an optional PAN: blank becomes `None`, otherwise upper-cased
/// and checked against the `AAAAA9999A` format.
///
/// # Errors
///
/// Returns `InvalidPan` for a non-blank malformed PAN.
pub fn normalize_pan(pan: Option<&str>) -> Result<Option<String>, ComplianceViolation> {
    let Some(raw) = pan.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let pan = raw.to_ascii_uppercase();
    let bytes = pan.as_bytes();
    let valid = bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase();
    if valid {
        Ok(Some(pan))
    } else {
        Err(ComplianceViolation::InvalidPan(raw.to_string()))
    }
}
