use crate::db::{DbPool, ExecuteWithRetry};
use crate::dto::{CreateCustomerDto, UpdateCustomerDto};
use crate::errors::DomainError;
use crate::models::{Booking, Customer};
use crate::schema::{bookings, customers};
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new customer for the tenant
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `tenant_id` - The tenant the customer belongs to
/// * `dto` - The validated customer fields
///
/// ### Returns
///
/// A Result containing the newly created Customer if successful
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id))]
pub async fn create_customer(pool: &DbPool, tenant_id: &str, dto: CreateCustomerDto) -> Result<Customer> {
    debug!("Creating new customer");

    let mut conn = pool.get()?;

    let new_customer = Customer::new(
        tenant_id.to_string(),
        dto.name,
        dto.email,
        dto.phone,
        dto.license_number,
        dto.notes,
    );

    diesel::insert_into(customers::table)
        .values(new_customer.clone())
        .execute_with_retry(&mut conn)
        .await?;

    info!("Successfully created customer with id: {}", new_customer.get_id());
    Ok(new_customer)
}

/// Retrieves a customer of the tenant by ID
///
/// ### Returns
///
/// A Result containing an Option with the Customer if found in this tenant
#[instrument(skip(pool), fields(tenant_id = %tenant_id, customer_id = %customer_id))]
pub fn get_customer(pool: &DbPool, tenant_id: &str, customer_id: &str) -> Result<Option<Customer>> {
    let conn = &mut pool.get()?;
    find_customer(conn, tenant_id, customer_id)
}

pub(crate) fn find_customer(conn: &mut SqliteConnection, tenant_id: &str, customer_id: &str) -> Result<Option<Customer>> {
    let result = customers::table
        .filter(customers::tenant_id.eq(tenant_id))
        .filter(customers::id.eq(customer_id))
        .first::<Customer>(conn)
        .optional()?;
    Ok(result)
}

/// Lists the tenant's customers ordered by name
///
/// When `search` is given, only customers whose name or email contains it
/// as a literal, case-insensitive substring are returned.
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub fn list_customers(pool: &DbPool, tenant_id: &str, search: Option<&str>) -> Result<Vec<Customer>> {
    let conn = &mut pool.get()?;

    let customers = customers::table
        .filter(customers::tenant_id.eq(tenant_id))
        .order(customers::name.asc())
        .load::<Customer>(conn)?;

    // SQLite only folds ASCII case, so matching happens here
    let result: Vec<Customer> = match search.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => {
            let needle = term.to_lowercase();
            customers
                .into_iter()
                .filter(|c| {
                    c.get_name().to_lowercase().contains(&needle)
                        || c.get_email().is_some_and(|e| e.to_lowercase().contains(&needle))
                })
                .collect()
        }
        None => customers,
    };

    debug!("Retrieved {} customers", result.len());
    Ok(result)
}

/// Applies a partial update to a customer
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the customer does not exist in the tenant
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, customer_id = %customer_id))]
pub async fn update_customer(pool: &DbPool, tenant_id: &str, customer_id: &str, dto: UpdateCustomerDto) -> Result<Customer> {
    debug!("Updating customer");

    let mut conn = pool.get()?;
    find_customer(&mut conn, tenant_id, customer_id)?.ok_or(DomainError::NotFound("Customer"))?;

    #[derive(AsChangeset, Clone)]
    #[diesel(table_name = customers)]
    struct CustomerChangeset {
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        license_number: Option<String>,
        notes: Option<String>,
        updated_at: NaiveDateTime,
    }

    let changeset = CustomerChangeset {
        name: dto.name,
        email: dto.email,
        phone: dto.phone,
        license_number: dto.license_number,
        notes: dto.notes,
        updated_at: Utc::now().naive_utc(),
    };

    diesel::update(customers::table.find(customer_id.to_string()))
        .set(changeset)
        .execute_with_retry(&mut conn)
        .await?;

    let updated = find_customer(&mut conn, tenant_id, customer_id)?.ok_or(DomainError::NotFound("Customer"))?;
    info!("Updated customer with id: {}", customer_id);
    Ok(updated)
}

/// Deletes a customer that has no bookings
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the customer does not exist in the
/// tenant, or `DomainError::Conflict` if bookings still reference it
#[instrument(skip(pool), fields(tenant_id = %tenant_id, customer_id = %customer_id))]
pub async fn delete_customer(pool: &DbPool, tenant_id: &str, customer_id: &str) -> Result<()> {
    let mut conn = pool.get()?;
    find_customer(&mut conn, tenant_id, customer_id)?.ok_or(DomainError::NotFound("Customer"))?;

    let booking_count = bookings::table
        .filter(bookings::customer_id.eq(customer_id))
        .count()
        .get_result::<i64>(&mut conn)?;
    if booking_count > 0 {
        return Err(DomainError::Conflict(format!("Customer has {} booking(s)", booking_count)).into());
    }

    diesel::delete(customers::table.find(customer_id.to_string()))
        .execute_with_retry(&mut conn)
        .await?;

    info!("Deleted customer with id: {}", customer_id);
    Ok(())
}

/// Lists a customer's bookings, most recent stay first
#[instrument(skip(pool), fields(tenant_id = %tenant_id, customer_id = %customer_id))]
pub fn list_customer_bookings(pool: &DbPool, tenant_id: &str, customer_id: &str) -> Result<Vec<Booking>> {
    let conn = &mut pool.get()?;
    find_customer(conn, tenant_id, customer_id)?.ok_or(DomainError::NotFound("Customer"))?;

    let result = bookings::table
        .filter(bookings::tenant_id.eq(tenant_id))
        .filter(bookings::customer_id.eq(customer_id))
        .order(bookings::start_date.desc())
        .load::<Booking>(conn)?;
    Ok(result)
}

#[cfg(test)]
mod tests;
