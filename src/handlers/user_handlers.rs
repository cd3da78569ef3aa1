use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::dto::CreateUserDto;
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;
use crate::tenancy::TenantContext;

/// Handler for adding a staff user to the tenant
///
/// This function handles POST requests to `/users`.
///
/// ### Returns
///
/// The newly created user as JSON; 409 if the email is already in use
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, email = %payload.email))]
pub async fn create_user_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Json(payload): Json<CreateUserDto>,
) -> Result<Json<User>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let user = repo::create_user(
        &pool,
        &tenant.tenant_id,
        payload.email.trim().to_lowercase(),
        payload.name,
        payload.role,
    )
    .await?;

    info!("Created user with id: {}", user.get_id());
    Ok(Json(user))
}

/// Handler for listing the tenant's users
///
/// This function handles GET requests to `/users`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_users_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(repo::list_users(&pool, &tenant.tenant_id)?))
}

/// Handler for retrieving a user
///
/// This function handles GET requests to `/users/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, user_id = %user_id))]
pub async fn get_user_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = repo::get_user(&pool, &tenant.tenant_id, &user_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// Handler for removing a user
///
/// This function handles DELETE requests to `/users/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, user_id = %user_id))]
pub async fn delete_user_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(user_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    repo::delete_user(&pool, &tenant.tenant_id, &user_id).await?;
    info!("Deleted user with id: {}", user_id);
    Ok(Json(()))
}
