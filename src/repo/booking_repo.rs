use crate::db::{DbPool, ExecuteWithRetry};
use crate::dto::{BookingQueryDto, CreateBookingDto, UpdateBookingDto};
use crate::errors::DomainError;
use crate::models::{Booking, BookingStatus, Customer, Item, Tenant, nights};
use crate::reports::round_cents;
use crate::schema::{bookings, customers, invoices, items, tenants};
use anyhow::Result;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::{debug, info, instrument, warn};

use super::customer_repo::find_customer;
use super::item_repo::find_item;

/// Finds the blocking bookings of an item that intersect `[start, end)`
///
/// This is the overlap predicate `a.start < b.end && b.start < a.end`
/// expressed as a query filter, so it can run inside the transaction that
/// inserts or moves a booking. `exclude_id` leaves a booking out of the
/// check, which is how an edited booking avoids conflicting with itself.
pub(crate) fn find_conflicts(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    item_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<&str>,
) -> QueryResult<Vec<Booking>> {
    let mut query = bookings::table
        .filter(bookings::tenant_id.eq(tenant_id))
        .filter(bookings::item_id.eq(item_id))
        .filter(bookings::status.eq_any(BookingStatus::BLOCKING))
        .filter(bookings::start_date.lt(end))
        .filter(bookings::end_date.gt(start))
        .into_boxed();

    if let Some(id) = exclude_id {
        query = query.filter(bookings::id.ne(id));
    }

    query.order(bookings::start_date.asc()).load::<Booking>(conn)
}

fn reject_conflicts(conflicts: Vec<Booking>) -> Result<()> {
    if conflicts.is_empty() {
        return Ok(());
    }
    let conflicting_ids: Vec<String> = conflicts.iter().map(|b| b.get_id()).collect();
    warn!("Rejecting booking overlapping {:?}", conflicting_ids);
    Err(DomainError::BookingOverlap { conflicting_ids }.into())
}

fn require_bookable(item: &Item) -> Result<()> {
    if !item.is_bookable() {
        return Err(DomainError::Invalid(format!("Item '{}' is retired and cannot be booked", item.get_name())).into());
    }
    Ok(())
}

fn default_price(item: &Item, start: NaiveDate, end: NaiveDate) -> f64 {
    round_cents(nights(start, end) as f64 * item.get_daily_rate())
}

/// Checks whether an item is free for `[start, end)`
///
/// ### Returns
///
/// The blocking bookings that occupy part of the range; empty when the item
/// is available
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the item does not exist in the tenant
#[instrument(skip(pool), fields(tenant_id = %tenant_id, item_id = %item_id, start = %start, end = %end))]
pub fn check_availability(pool: &DbPool, tenant_id: &str, item_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>> {
    let conn = &mut pool.get()?;
    find_item(conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;
    Ok(find_conflicts(conn, tenant_id, item_id, start, end, None)?)
}

/// Creates a new pending booking
///
/// The overlap check and the insert run inside one immediate transaction,
/// which takes SQLite's write lock up front, so two concurrent requests for
/// the same dates cannot both pass the check.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `tenant_id` - The tenant taking the booking
/// * `dto` - The validated booking request
///
/// ### Returns
///
/// A Result containing the newly created Booking if successful
///
/// ### Errors
///
/// Returns an error if:
/// - The item or customer does not exist in the tenant (`DomainError::NotFound`)
/// - The item is retired (`DomainError::Invalid`)
/// - A blocking booking already holds part of the range (`DomainError::BookingOverlap`)
/// - The database insert fails
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, item_id = %dto.item_id, start = %dto.start_date, end = %dto.end_date))]
pub async fn create_booking(pool: &DbPool, tenant_id: &str, dto: CreateBookingDto) -> Result<Booking> {
    debug!("Creating new booking");

    let mut conn = pool.get()?;

    let booking = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let item = find_item(conn, tenant_id, &dto.item_id)?.ok_or(DomainError::NotFound("Item"))?;
        require_bookable(&item)?;
        find_customer(conn, tenant_id, &dto.customer_id)?.ok_or(DomainError::NotFound("Customer"))?;

        reject_conflicts(find_conflicts(conn, tenant_id, &dto.item_id, dto.start_date, dto.end_date, None)?)?;

        let total_price = dto
            .total_price
            .unwrap_or_else(|| default_price(&item, dto.start_date, dto.end_date));

        let booking = Booking::new(
            tenant_id.to_string(),
            dto.item_id,
            dto.customer_id,
            dto.start_date,
            dto.end_date,
            total_price,
            dto.notes,
        );
        diesel::insert_into(bookings::table)
            .values(booking.clone())
            .execute(conn)?;
        Ok(booking)
    })?;

    info!("Successfully created booking with id: {}", booking.get_id());
    Ok(booking)
}

/// Retrieves a booking of the tenant by ID
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub fn get_booking(pool: &DbPool, tenant_id: &str, booking_id: &str) -> Result<Option<Booking>> {
    let conn = &mut pool.get()?;
    find_booking(conn, tenant_id, booking_id)
}

pub(crate) fn find_booking(conn: &mut SqliteConnection, tenant_id: &str, booking_id: &str) -> Result<Option<Booking>> {
    let result = bookings::table
        .filter(bookings::tenant_id.eq(tenant_id))
        .filter(bookings::id.eq(booking_id))
        .first::<Booking>(conn)
        .optional()?;
    Ok(result)
}

/// A booking together with the records its documents and emails refer to
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub tenant: Tenant,
    pub booking: Booking,
    pub customer: Customer,
    pub item: Item,
}

/// Retrieves a booking of the tenant with its tenant, customer and item
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub fn get_booking_details(pool: &DbPool, tenant_id: &str, booking_id: &str) -> Result<Option<BookingDetails>> {
    let conn = &mut pool.get()?;
    find_booking_details(conn, tenant_id, booking_id)
}

pub(crate) fn find_booking_details(conn: &mut SqliteConnection, tenant_id: &str, booking_id: &str) -> Result<Option<BookingDetails>> {
    let Some(booking) = find_booking(conn, tenant_id, booking_id)? else {
        return Ok(None);
    };
    let tenant = tenants::table.find(tenant_id).first::<Tenant>(conn)?;
    let customer = customers::table.find(booking.get_customer_id()).first::<Customer>(conn)?;
    let item = items::table.find(booking.get_item_id()).first::<Item>(conn)?;

    Ok(Some(BookingDetails { tenant, booking, customer, item }))
}

/// Lists the tenant's bookings matching the query, ordered by start date
///
/// Every filter is optional. Several statuses match any of them; `from` and
/// `to` keep bookings that occupy at least one day of `[from, to)`.
#[instrument(skip(pool, filter), fields(tenant_id = %tenant_id))]
pub fn list_bookings(pool: &DbPool, tenant_id: &str, filter: &BookingQueryDto) -> Result<Vec<Booking>> {
    let conn = &mut pool.get()?;

    let mut query = bookings::table
        .filter(bookings::tenant_id.eq(tenant_id))
        .into_boxed();

    if !filter.status.is_empty() {
        query = query.filter(bookings::status.eq_any(filter.status.clone()));
    }
    if let Some(item_id) = &filter.item_id {
        query = query.filter(bookings::item_id.eq(item_id.clone()));
    }
    if let Some(customer_id) = &filter.customer_id {
        query = query.filter(bookings::customer_id.eq(customer_id.clone()));
    }
    if let Some(from) = filter.from {
        query = query.filter(bookings::end_date.gt(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(bookings::start_date.lt(to));
    }

    let result = query
        .order((bookings::start_date.asc(), bookings::created_at.asc()))
        .load::<Booking>(conn)?;

    debug!("Retrieved {} bookings", result.len());
    Ok(result)
}

/// Edits a booking's item, dates, price or notes
///
/// A blocking booking is re-checked for overlaps against every other
/// booking of its (possibly new) item. When the item or dates change and no
/// price is given, the price is recomputed from the item's daily rate.
///
/// ### Errors
///
/// Returns an error if:
/// - The booking, or a newly chosen item, does not exist in the tenant
/// - The booking is completed or cancelled (`DomainError::Conflict`)
/// - The resulting range is empty or the new item is retired (`DomainError::Invalid`)
/// - The new range overlaps another booking (`DomainError::BookingOverlap`)
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub async fn update_booking(pool: &DbPool, tenant_id: &str, booking_id: &str, dto: UpdateBookingDto) -> Result<Booking> {
    debug!("Updating booking");

    let mut conn = pool.get()?;

    let booking = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut booking = find_booking(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;
        if booking.get_status().is_terminal() {
            return Err(DomainError::Conflict(format!(
                "Booking is {} and can no longer be edited",
                booking.get_status()
            ))
            .into());
        }

        let item_changed = dto.item_id.as_ref().is_some_and(|id| *id != booking.get_item_id());
        let item_id = dto.item_id.unwrap_or_else(|| booking.get_item_id());
        let item = find_item(conn, tenant_id, &item_id)?.ok_or(DomainError::NotFound("Item"))?;
        if item_changed {
            require_bookable(&item)?;
            booking.set_item_id(item_id.clone());
        }

        let start = dto.start_date.unwrap_or(booking.get_start_date());
        let end = dto.end_date.unwrap_or(booking.get_end_date());
        if end <= start {
            return Err(DomainError::Invalid("end_date must be after start_date".to_string()).into());
        }
        let dates_changed = start != booking.get_start_date() || end != booking.get_end_date();
        booking.set_dates(start, end);

        if booking.get_status().is_blocking() {
            reject_conflicts(find_conflicts(conn, tenant_id, &item_id, start, end, Some(booking_id))?)?;
        }

        match dto.total_price {
            Some(price) => booking.set_total_price(price),
            None if item_changed || dates_changed => booking.set_total_price(default_price(&item, start, end)),
            None => {}
        }
        if dto.notes.is_some() {
            booking.set_notes(dto.notes);
        }

        diesel::update(bookings::table.find(booking_id))
            .set(&booking)
            .execute(conn)?;
        Ok(booking)
    })?;

    info!("Updated booking with id: {}", booking_id);
    Ok(booking)
}

/// Moves a booking to a new status
///
/// Only the transitions allowed by `BookingStatus::can_transition_to` are
/// accepted. Entering a blocking status re-runs the overlap check.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the booking does not exist in the
/// tenant, `DomainError::InvalidTransition` for a disallowed move, or
/// `DomainError::BookingOverlap` if the dates are no longer free
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id, status = %next))]
pub async fn update_booking_status(pool: &DbPool, tenant_id: &str, booking_id: &str, next: BookingStatus) -> Result<Booking> {
    debug!("Changing booking status");

    let mut conn = pool.get()?;

    let booking = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let mut booking = find_booking(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;
        let current = booking.get_status();

        if !current.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        if next.is_blocking() {
            let conflicts = find_conflicts(
                conn,
                tenant_id,
                &booking.get_item_id(),
                booking.get_start_date(),
                booking.get_end_date(),
                Some(booking_id),
            )?;
            reject_conflicts(conflicts)?;
        }

        booking.set_status(next);
        diesel::update(bookings::table.find(booking_id))
            .set(&booking)
            .execute(conn)?;
        Ok(booking)
    })?;

    info!("Booking {} is now {}", booking_id, next);
    Ok(booking)
}

/// Deletes a pending or cancelled booking that has not been invoiced
///
/// Its contract and inspections are removed with it.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the booking does not exist in the
/// tenant, or `DomainError::Conflict` if it is confirmed, active, completed
/// or has invoices
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub async fn delete_booking(pool: &DbPool, tenant_id: &str, booking_id: &str) -> Result<()> {
    let mut conn = pool.get()?;

    let booking = find_booking(&mut conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;
    if !matches!(booking.get_status(), BookingStatus::Pending | BookingStatus::Cancelled) {
        return Err(DomainError::Conflict(format!(
            "Only pending or cancelled bookings can be deleted; this one is {}",
            booking.get_status()
        ))
        .into());
    }

    let invoice_count = invoices::table
        .filter(invoices::booking_id.eq(booking_id))
        .count()
        .get_result::<i64>(&mut conn)?;
    if invoice_count > 0 {
        return Err(DomainError::Conflict("Booking has been invoiced".to_string()).into());
    }

    diesel::delete(bookings::table.find(booking_id.to_string()))
        .execute_with_retry(&mut conn)
        .await?;

    info!("Deleted booking with id: {}", booking_id);
    Ok(())
}
