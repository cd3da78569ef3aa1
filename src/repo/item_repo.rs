use crate::db::{DbPool, ExecuteWithRetry};
use crate::dto::{CreateItemDto, UpdateItemDto};
use crate::errors::DomainError;
use crate::models::{Booking, Item, ItemKind, ItemStatus};
use crate::schema::{bookings, items};
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new item in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `tenant_id` - The tenant managing the item
/// * `dto` - The validated item fields
///
/// ### Returns
///
/// A Result containing the newly created Item if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, name = %dto.name))]
pub async fn create_item(pool: &DbPool, tenant_id: &str, dto: CreateItemDto) -> Result<Item> {
    debug!("Creating new item");

    let mut conn = pool.get()?;

    let new_item = Item::new(tenant_id.to_string(), dto.kind, dto.name, dto.daily_rate)
        .with_registration(dto.registration)
        .with_owner(dto.owner_name, dto.commission_rate)
        .with_mileage(dto.mileage);

    debug!("Inserting item into database with id: {}", new_item.get_id());

    diesel::insert_into(items::table)
        .values(new_item.clone())
        .execute_with_retry(&mut conn)
        .await?;

    info!("Successfully created item with id: {}", new_item.get_id());
    Ok(new_item)
}

/// Retrieves an item of the tenant by its ID
///
/// ### Returns
///
/// A Result containing an Option with the Item if found, or None if it does
/// not exist or belongs to another tenant
#[instrument(skip(pool), fields(tenant_id = %tenant_id, item_id = %item_id))]
pub fn get_item(pool: &DbPool, tenant_id: &str, item_id: &str) -> Result<Option<Item>> {
    debug!("Retrieving item by id");

    let conn = &mut pool.get()?;
    find_item(conn, tenant_id, item_id)
}

pub(crate) fn find_item(conn: &mut SqliteConnection, tenant_id: &str, item_id: &str) -> Result<Option<Item>> {
    let result = items::table
        .filter(items::tenant_id.eq(tenant_id))
        .filter(items::id.eq(item_id))
        .first::<Item>(conn)
        .optional()?;
    Ok(result)
}

/// Lists the tenant's items, optionally filtered by kind and status
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub fn list_items(pool: &DbPool, tenant_id: &str, kind: Option<ItemKind>, status: Option<ItemStatus>) -> Result<Vec<Item>> {
    debug!("Listing items");

    let conn = &mut pool.get()?;

    let mut query = items::table
        .filter(items::tenant_id.eq(tenant_id))
        .into_boxed();
    if let Some(kind) = kind {
        query = query.filter(items::kind.eq(kind));
    }
    if let Some(status) = status {
        query = query.filter(items::status.eq(status));
    }

    let result = query.order(items::name.asc()).load::<Item>(conn)?;

    info!("Retrieved {} items", result.len());
    Ok(result)
}

/// Applies a partial update to an item
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the item does not exist in the tenant
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, item_id = %item_id))]
pub async fn update_item(pool: &DbPool, tenant_id: &str, item_id: &str, dto: UpdateItemDto) -> Result<Item> {
    debug!("Updating item by id");

    let mut conn = pool.get()?;
    find_item(&mut conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;

    // Only the fields that are Some end up in the UPDATE
    #[derive(AsChangeset, Clone)]
    #[diesel(table_name = items)]
    struct ItemChangeset {
        name: Option<String>,
        registration: Option<String>,
        owner_name: Option<String>,
        commission_rate: Option<f64>,
        daily_rate: Option<f64>,
        mileage: Option<i32>,
        status: Option<ItemStatus>,
        updated_at: NaiveDateTime,
    }

    let changeset = ItemChangeset {
        name: dto.name,
        registration: dto.registration,
        owner_name: dto.owner_name,
        commission_rate: dto.commission_rate,
        daily_rate: dto.daily_rate,
        mileage: dto.mileage,
        status: dto.status,
        updated_at: Utc::now().naive_utc(),
    };

    diesel::update(items::table.find(item_id.to_string()))
        .set(changeset)
        .execute_with_retry(&mut conn)
        .await?;

    let updated = find_item(&mut conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;
    Ok(updated)
}

/// Deletes an item that has never been booked
///
/// Maintenance records go with the item; expenses stay and lose their link.
/// Items with booking history should be retired instead.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the item does not exist in the tenant,
/// or `DomainError::Conflict` if bookings reference it
#[instrument(skip(pool), fields(tenant_id = %tenant_id, item_id = %item_id))]
pub async fn delete_item(pool: &DbPool, tenant_id: &str, item_id: &str) -> Result<()> {
    debug!("Deleting item by id");

    let mut conn = pool.get()?;
    find_item(&mut conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;

    let booking_count = bookings::table
        .filter(bookings::item_id.eq(item_id))
        .count()
        .get_result::<i64>(&mut conn)?;
    if booking_count > 0 {
        return Err(DomainError::Conflict(format!(
            "Item has {} booking(s); retire it instead",
            booking_count
        ))
        .into());
    }

    diesel::delete(items::table.find(item_id.to_string()))
        .execute_with_retry(&mut conn)
        .await?;

    debug!("Successfully deleted item with id: {}", item_id);
    Ok(())
}

/// Lists an item's bookings ordered by start date
#[instrument(skip(pool), fields(tenant_id = %tenant_id, item_id = %item_id))]
pub fn list_item_bookings(pool: &DbPool, tenant_id: &str, item_id: &str) -> Result<Vec<Booking>> {
    let conn = &mut pool.get()?;
    find_item(conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;

    let result = bookings::table
        .filter(bookings::tenant_id.eq(tenant_id))
        .filter(bookings::item_id.eq(item_id))
        .order(bookings::start_date.asc())
        .load::<Booking>(conn)?;
    Ok(result)
}

/// Raises the item's recorded mileage to `mileage` if it is higher than the
/// current reading
pub(crate) fn advance_mileage(conn: &mut SqliteConnection, item_id: &str, mileage: i32) -> QueryResult<usize> {
    diesel::update(
        items::table
            .filter(items::id.eq(item_id))
            .filter(items::mileage.is_null().or(items::mileage.assume_not_null().lt(mileage))),
    )
    .set((
        items::mileage.eq(mileage),
        items::updated_at.eq(Utc::now().naive_utc()),
    ))
    .execute(conn)
}

#[cfg(test)]
mod tests;
