//! Request extractors for the resolved tenant context.

use axum::{extract::FromRequestParts, http::request::Parts};
use mizan_core::tenant::{RequestContext, TenantContext};
use mizan_shared::AppError;

use crate::error::ApiError;

fn context(parts: &Parts) -> Result<&RequestContext, ApiError> {
    parts
        .extensions
        .get::<RequestContext>()
        .ok_or_else(|| AppError::Internal("tenant middleware not installed".into()).into())
}

/// The resolved context, public or tenant.
#[derive(Debug, Clone)]
pub struct Context(pub RequestContext);

impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts).cloned().map(Context)
    }
}

/// The workspace a tenant-private route runs in.
///
/// Rejects with 403 `PUBLIC_SCHEMA_ACCESS_DENIED` in the public context.
#[derive(Debug, Clone)]
pub struct Workspace(pub TenantContext);

impl<S> FromRequestParts<S> for Workspace
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = context(parts)?.require_tenant()?;
        Ok(Workspace(tenant.clone()))
    }
}

/// Guard for registration and lookup routes.
///
/// Rejects with 403 `PUBLIC_ENDPOINT_ONLY` inside a workspace.
#[derive(Debug, Clone, Copy)]
pub struct PublicSite;

impl<S> FromRequestParts<S> for PublicSite
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context(parts)?.require_public()?;
        Ok(PublicSite)
    }
}
