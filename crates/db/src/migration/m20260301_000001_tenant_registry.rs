//! Public tenant registry.
//!
//! Creates the only tables that live in the shared `public` schema:
//! `tenants` and the `domains` that route hosts to them. Ledger data never
//! lands here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(DOMAINS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const TENANTS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS public.tenants (
    id                  UUID PRIMARY KEY,
    name                VARCHAR(100) NOT NULL,
    schema_name         VARCHAR(63) NOT NULL UNIQUE
                        CHECK (schema_name ~ '^[a-z][a-z0-9_]*$'),
    owner_email         VARCHAR(255) NOT NULL,
    is_email_verified   BOOLEAN NOT NULL DEFAULT FALSE,
    verification_token  UUID UNIQUE,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_tenants_owner_email ON public.tenants (LOWER(owner_email));
";

const DOMAINS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS public.domains (
    id          UUID PRIMARY KEY,
    domain      VARCHAR(253) NOT NULL UNIQUE,
    tenant_id   UUID NOT NULL REFERENCES public.tenants(id) ON DELETE CASCADE,
    is_primary  BOOLEAN NOT NULL DEFAULT TRUE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_domains_tenant ON public.domains (tenant_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS public.domains CASCADE;
DROP TABLE IF EXISTS public.tenants CASCADE;
";
