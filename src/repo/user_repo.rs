use crate::db::{DbPool, ExecuteWithRetry};
use crate::errors::DomainError;
use crate::models::{User, UserRole};
use crate::schema::users;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a staff user inside a tenant
///
/// ### Errors
///
/// Returns `DomainError::Conflict` if the tenant already has a user with
/// this email
#[instrument(skip(pool), fields(tenant_id = %tenant_id, email = %email))]
pub async fn create_user(pool: &DbPool, tenant_id: &str, email: String, name: String, role: UserRole) -> Result<User> {
    debug!("Creating new user");

    let mut conn = pool.get()?;

    let existing = users::table
        .filter(users::tenant_id.eq(tenant_id))
        .filter(users::email.eq(&email))
        .count()
        .get_result::<i64>(&mut conn)?;
    if existing > 0 {
        return Err(DomainError::Conflict(format!("A user with email {} already exists", email)).into());
    }

    let new_user = User::new(tenant_id.to_string(), email, name, role);

    diesel::insert_into(users::table)
        .values(new_user.clone())
        .execute_with_retry(&mut conn)
        .await?;

    info!("Successfully created user with id: {}", new_user.get_id());
    Ok(new_user)
}

/// Retrieves a user of the tenant by ID
#[instrument(skip(pool), fields(tenant_id = %tenant_id, user_id = %user_id))]
pub fn get_user(pool: &DbPool, tenant_id: &str, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;
    let result = users::table
        .filter(users::tenant_id.eq(tenant_id))
        .filter(users::id.eq(user_id))
        .first::<User>(conn)
        .optional()?;
    Ok(result)
}

/// Lists the tenant's users ordered by name
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub fn list_users(pool: &DbPool, tenant_id: &str) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;
    let result = users::table
        .filter(users::tenant_id.eq(tenant_id))
        .order(users::name.asc())
        .load::<User>(conn)?;
    debug!("Retrieved {} users", result.len());
    Ok(result)
}

/// Deletes a user of the tenant
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if no such user exists in the tenant
#[instrument(skip(pool), fields(tenant_id = %tenant_id, user_id = %user_id))]
pub async fn delete_user(pool: &DbPool, tenant_id: &str, user_id: &str) -> Result<()> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        users::table
            .filter(users::tenant_id.eq(tenant_id.to_string()))
            .filter(users::id.eq(user_id.to_string())),
    )
    .execute_with_retry(&mut conn)
    .await?;

    if deleted == 0 {
        return Err(DomainError::NotFound("User").into());
    }

    info!("Deleted user with id: {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests;
