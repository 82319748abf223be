//! Household membership subscriptions.
//!
//! Households pay a fee per cycle. Status is derived from what was paid
//! against what the cycle requires and is never stored.

mod subscription;

pub use subscription::{MembershipCycle, PaymentSplit, SubscriptionStatus, SubscriptionWindow, split_payment, status};
