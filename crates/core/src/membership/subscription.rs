use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee cycle of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipCycle {
    /// 365 days.
    Annual,
    /// 182 days.
    BiYearly,
    /// 30 days.
    Monthly,
}

impl MembershipCycle {
    /// Length of the cycle in days.
    #[must_use]
    pub const fn days(self) -> u64 {
        match self {
            Self::Annual => 365,
            Self::BiYearly => 182,
            Self::Monthly => 30,
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "ANNUAL",
            Self::BiYearly => "BI_YEARLY",
            Self::Monthly => "MONTHLY",
        }
    }

    /// End date of a cycle that starts on `start`.
    #[must_use]
    pub fn end_date(self, start: NaiveDate) -> NaiveDate {
        start.checked_add_days(Days::new(self.days())).unwrap_or(NaiveDate::MAX)
    }
}

impl std::str::FromStr for MembershipCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ANNUAL" => Ok(Self::Annual),
            "BI_YEARLY" => Ok(Self::BiYearly),
            "MONTHLY" => Ok(Self::Monthly),
            other => Err(format!("unknown membership cycle '{other}'")),
        }
    }
}

/// Computed subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Fully paid.
    Active,
    /// Underpaid, cycle still running.
    Pending,
    /// Underpaid and the cycle has ended.
    Expired,
}

impl SubscriptionStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Pending => "PENDING",
            Self::Expired => "EXPIRED",
        }
    }
}

/// ACTIVE if `amount_paid >= minimum_required`, otherwise EXPIRED once
/// `end_date` is before `today`, otherwise PENDING.
#[must_use]
pub fn status(
    amount_paid: Decimal,
    minimum_required: Decimal,
    end_date: NaiveDate,
    today: NaiveDate,
) -> SubscriptionStatus {
    if amount_paid >= minimum_required {
        SubscriptionStatus::Active
    } else if end_date < today {
        SubscriptionStatus::Expired
    } else {
        SubscriptionStatus::Pending
    }
}

/// A payment divided between the membership fee and a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentSplit {
    /// Credited to membership fees, at most the required amount.
    pub membership: Decimal,
    /// Anything paid beyond the required amount.
    pub donation: Decimal,
}

/// Splits a payment into membership and donation portions.
///
/// Negative payments are treated as zero.
#[must_use]
pub fn split_payment(amount_paid: Decimal, minimum_required: Decimal) -> PaymentSplit {
    let paid = amount_paid.max(Decimal::ZERO);
    let required = minimum_required.max(Decimal::ZERO);
    let membership = paid.min(required);
    PaymentSplit {
        membership,
        donation: paid - membership,
    }
}

/// A subscription's cycle window with its payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionWindow {
    /// Cycle.
    pub cycle: MembershipCycle,
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
    /// Fee for the window.
    pub minimum_required: Decimal,
    /// Paid so far.
    pub amount_paid: Decimal,
}

impl SubscriptionWindow {
    /// Opens a window starting on `start_date`.
    #[must_use]
    pub fn open(cycle: MembershipCycle, start_date: NaiveDate, minimum_required: Decimal) -> Self {
        Self {
            cycle,
            start_date,
            end_date: cycle.end_date(start_date),
            minimum_required,
            amount_paid: Decimal::ZERO,
        }
    }

    /// Status as of `today`.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> SubscriptionStatus {
        status(self.amount_paid, self.minimum_required, self.end_date, today)
    }

    /// Records a payment and returns how it splits.
    pub fn pay(&mut self, amount: Decimal) -> PaymentSplit {
        let outstanding = (self.minimum_required - self.amount_paid).max(Decimal::ZERO);
        let split = split_payment(amount, outstanding);
        self.amount_paid += split.membership;
        split
    }
}
