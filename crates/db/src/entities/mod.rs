//! `SeaORM` entity definitions.
//!
//! `tenants` and `domains` live in the shared `public` schema and name it
//! explicitly. Every other entity is unqualified and resolves through the
//! `search_path` set by [`crate::schema::TenantConnection`].

pub mod domains;
pub mod journal_entries;
pub mod journal_items;
pub mod ledgers;
pub mod sea_orm_active_enums;
pub mod tenants;
pub mod users;
pub mod voucher_sequences;
