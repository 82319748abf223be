//! Per-tenant schema DDL.
//!
//! Every workspace gets the same set of tables inside its own schema. The
//! statements are unqualified and run after `search_path` points at the new
//! schema, inside the provisioning transaction, so a failure leaves nothing
//! behind.

use mizan_core::tenant::SchemaName;
use sea_orm::{ConnectionTrait, DbErr};

use crate::schema::search_path_sql;

/// Creates `schema` and its tables on `conn`.
///
/// Must run inside a transaction: `search_path` is set with `SET LOCAL`.
///
/// # Errors
///
/// Returns `DbErr` if the schema already exists or any statement fails.
pub async fn create_tenant_schema<C>(conn: &C, schema: &SchemaName) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute_unprepared(&create_schema_sql(schema)).await?;
    conn.execute_unprepared(&search_path_sql(schema)).await?;

    for statement in TENANT_TABLES {
        conn.execute_unprepared(statement).await?;
    }
    Ok(())
}

/// `CREATE SCHEMA` for a validated identifier.
#[must_use]
pub fn create_schema_sql(schema: &SchemaName) -> String {
    format!("CREATE SCHEMA {}", schema.quoted())
}

/// `DROP SCHEMA ... CASCADE` used to clean up a failed provisioning.
#[must_use]
pub fn drop_schema_sql(schema: &SchemaName) -> String {
    format!("DROP SCHEMA IF EXISTS {} CASCADE", schema.quoted())
}

/// Tables in creation order.
pub const TENANT_TABLES: &[&str] = &[
    USERS_SQL,
    LEDGERS_SQL,
    HOUSEHOLDS_SQL,
    MEMBERS_SQL,
    SUBSCRIPTIONS_SQL,
    SUPPLIERS_SQL,
    JOURNAL_ENTRIES_SQL,
    JOURNAL_ITEMS_SQL,
    VOUCHER_SEQUENCES_SQL,
];

const USERS_SQL: &str = r"
CREATE TABLE users (
    id             UUID PRIMARY KEY,
    username       VARCHAR(150) NOT NULL UNIQUE,
    email          VARCHAR(255) NOT NULL,
    password_hash  VARCHAR(255) NOT NULL,
    full_name      VARCHAR(255),
    role           VARCHAR(20) NOT NULL CHECK (role IN ('admin', 'accountant', 'viewer')),
    is_active      BOOLEAN NOT NULL DEFAULT TRUE,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LEDGERS_SQL: &str = r"
CREATE TABLE ledgers (
    id            UUID PRIMARY KEY,
    code          VARCHAR(20) NOT NULL UNIQUE,
    name          VARCHAR(255) NOT NULL,
    account_type  VARCHAR(20) NOT NULL
                  CHECK (account_type IN ('ASSET', 'LIABILITY', 'EQUITY', 'INCOME', 'EXPENSE')),
    fund_type     VARCHAR(20)
                  CHECK (fund_type IN ('ZAKAT', 'SADAQAH', 'CONSTRUCTION', 'GENERAL')),
    parent_id     UUID REFERENCES ledgers(id),
    is_system     BOOLEAN NOT NULL DEFAULT FALSE,
    is_active     BOOLEAN NOT NULL DEFAULT TRUE,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE INDEX idx_ledgers_parent ON ledgers (parent_id);
";

const HOUSEHOLDS_SQL: &str = r"
CREATE TABLE households (
    id              UUID PRIMARY KEY,
    membership_id   VARCHAR(50) NOT NULL UNIQUE,
    address         TEXT,
    phone           VARCHAR(20),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const MEMBERS_SQL: &str = r"
CREATE TABLE members (
    id                UUID PRIMARY KEY,
    household_id      UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    full_name         VARCHAR(255) NOT NULL,
    is_head_of_family BOOLEAN NOT NULL DEFAULT FALSE,
    pan               VARCHAR(10),
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX idx_members_one_head ON members (household_id) WHERE is_head_of_family;
";

const SUBSCRIPTIONS_SQL: &str = r"
CREATE TABLE subscriptions (
    id                UUID PRIMARY KEY,
    household_id      UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    cycle             VARCHAR(20) NOT NULL CHECK (cycle IN ('ANNUAL', 'BI_YEARLY', 'MONTHLY')),
    start_date        DATE NOT NULL,
    end_date          DATE NOT NULL,
    minimum_required  NUMERIC(18, 2) NOT NULL CHECK (minimum_required >= 0),
    amount_paid       NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (amount_paid >= 0),
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (end_date >= start_date)
);
";

const SUPPLIERS_SQL: &str = r"
CREATE TABLE suppliers (
    id          UUID PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    gstin       VARCHAR(15),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id                   UUID PRIMARY KEY,
    voucher_number       VARCHAR(20) NOT NULL UNIQUE,
    voucher_type         VARCHAR(20) NOT NULL CHECK (voucher_type IN ('RECEIPT', 'PAYMENT', 'JOURNAL')),
    date                 DATE NOT NULL,
    narration            TEXT NOT NULL,
    donor_member_id      UUID REFERENCES members(id),
    donor_name           VARCHAR(255),
    donor_pan            VARCHAR(10),
    donor_intent         VARCHAR(255),
    supplier_id          UUID REFERENCES suppliers(id),
    vendor_invoice_no    VARCHAR(50),
    vendor_invoice_date  DATE,
    payment_mode         VARCHAR(20) CHECK (payment_mode IN ('CASH', 'BANK', 'UPI', 'CHEQUE')),
    total_amount         NUMERIC(18, 2) NOT NULL DEFAULT 0,
    is_finalized         BOOLEAN NOT NULL DEFAULT FALSE,
    finalized_at         TIMESTAMPTZ,
    reversal_of          UUID REFERENCES journal_entries(id),
    created_by           UUID REFERENCES users(id),
    created_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at           TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journal_entries_date ON journal_entries (date);
";

const JOURNAL_ITEMS_SQL: &str = r"
CREATE TABLE journal_items (
    id                UUID PRIMARY KEY,
    journal_entry_id  UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    ledger_id         UUID NOT NULL REFERENCES ledgers(id),
    line_no           INTEGER NOT NULL,
    debit_amount      NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (debit_amount >= 0),
    credit_amount     NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (credit_amount >= 0),
    particulars       TEXT,
    CHECK ((debit_amount > 0) <> (credit_amount > 0)),
    UNIQUE (journal_entry_id, line_no)
);

CREATE INDEX idx_journal_items_ledger ON journal_items (ledger_id);
";

const VOUCHER_SEQUENCES_SQL: &str = r"
CREATE TABLE voucher_sequences (
    voucher_type  VARCHAR(20) PRIMARY KEY,
    last_value    BIGINT NOT NULL
);
";
