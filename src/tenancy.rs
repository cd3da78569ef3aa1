//! Tenant resolution for incoming requests
//!
//! Every tenant-scoped route takes a [`TenantContext`], which reads the
//! `X-Tenant-Id` header and checks that the tenant exists before the handler
//! runs. Authenticating the caller is left to whatever sits in front of the
//! service.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tracing::debug;

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::repo;

/// Header carrying the caller's tenant id
pub const TENANT_HEADER: &str = "x-tenant-id";

/// The tenant a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self { tenant_id: tenant_id.into() }
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingTenant)?;

        let pool = Arc::<DbPool>::from_ref(state);
        let tenant = repo::get_tenant(&pool, tenant_id)?.ok_or_else(|| {
            debug!("Rejecting request for unknown tenant {}", tenant_id);
            ApiError::UnknownTenant
        })?;

        Ok(TenantContext::new(tenant.get_id()))
    }
}
