//! Core business logic for Mizan.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping, fund compliance, balances
//! - `reports` - Day book, trial balance, account statements
//! - `tenant` - Schema naming, host resolution policy, provisioning plans
//! - `membership` - Subscription status and payment split
//! - `auth` - Password hashing and workspace roles

pub mod auth;
pub mod ledger;
pub mod membership;
pub mod reports;
pub mod tenant;
