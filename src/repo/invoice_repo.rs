use crate::db::DbPool;
use crate::errors::DomainError;
use crate::models::{BookingStatus, Invoice, InvoiceStatus, invoice_number, invoice_number_prefix};
use crate::schema::invoices;
use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::booking_repo::find_booking;

/// Issues an invoice for a booking
///
/// The invoice amount is the booking's total price. Numbers run per tenant
/// and calendar year (`INV-2026-0001`, `INV-2026-0002`, ...); the number is
/// allocated inside the same write transaction as the insert.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `tenant_id` - The tenant issuing the invoice
/// * `booking_id` - The booking being billed
/// * `issued_on` - Issue date
/// * `due_days` - Days until payment is due
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the booking does not exist in the
/// tenant, or `DomainError::Conflict` if it is cancelled or already has an
/// invoice that is not void
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub async fn create_invoice(pool: &DbPool, tenant_id: &str, booking_id: &str, issued_on: NaiveDate, due_days: u32) -> Result<Invoice> {
    debug!("Issuing invoice");

    let mut conn = pool.get()?;

    let invoice = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let booking = find_booking(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;
        if booking.get_status() == BookingStatus::Cancelled {
            return Err(DomainError::Conflict("Cancelled bookings cannot be invoiced".to_string()).into());
        }

        let open = invoices::table
            .filter(invoices::booking_id.eq(booking_id))
            .filter(invoices::status.ne(InvoiceStatus::Void))
            .count()
            .get_result::<i64>(conn)?;
        if open > 0 {
            return Err(DomainError::Conflict("Booking already has an invoice".to_string()).into());
        }

        let issued_this_year = invoices::table
            .filter(invoices::tenant_id.eq(tenant_id))
            .filter(invoices::number.like(format!("{}%", invoice_number_prefix(issued_on))))
            .count()
            .get_result::<i64>(conn)?;

        let due_on = issued_on
            .checked_add_days(Days::new(u64::from(due_days)))
            .ok_or_else(|| DomainError::Invalid("Due date out of range".to_string()))?;

        let invoice = Invoice::new(
            tenant_id.to_string(),
            booking_id.to_string(),
            invoice_number(issued_on, issued_this_year + 1),
            booking.get_total_price(),
            issued_on,
            due_on,
        );
        diesel::insert_into(invoices::table)
            .values(invoice.clone())
            .execute(conn)?;
        Ok(invoice)
    })?;

    info!("Issued invoice {}", invoice.get_number());
    Ok(invoice)
}

/// Retrieves an invoice of the tenant by ID
#[instrument(skip(pool), fields(tenant_id = %tenant_id, invoice_id = %invoice_id))]
pub fn get_invoice(pool: &DbPool, tenant_id: &str, invoice_id: &str) -> Result<Option<Invoice>> {
    let conn = &mut pool.get()?;
    find_invoice(conn, tenant_id, invoice_id)
}

fn find_invoice(conn: &mut SqliteConnection, tenant_id: &str, invoice_id: &str) -> Result<Option<Invoice>> {
    let result = invoices::table
        .filter(invoices::tenant_id.eq(tenant_id))
        .filter(invoices::id.eq(invoice_id))
        .first::<Invoice>(conn)
        .optional()?;
    Ok(result)
}

/// Lists the tenant's invoices by number, optionally only those in `status`
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub fn list_invoices(pool: &DbPool, tenant_id: &str, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>> {
    let conn = &mut pool.get()?;

    let mut query = invoices::table
        .filter(invoices::tenant_id.eq(tenant_id))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(invoices::status.eq(status));
    }

    let result = query.order(invoices::number.asc()).load::<Invoice>(conn)?;
    Ok(result)
}

/// Marks an unpaid invoice as paid now
///
/// ### Errors
///
/// Returns `DomainError::Conflict` if the invoice is already paid or void
#[instrument(skip(pool), fields(tenant_id = %tenant_id, invoice_id = %invoice_id))]
pub async fn pay_invoice(pool: &DbPool, tenant_id: &str, invoice_id: &str) -> Result<Invoice> {
    let mut conn = pool.get()?;

    // Check and write under one write lock so a concurrent void cannot interleave
    let invoice = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let invoice = find_invoice(conn, tenant_id, invoice_id)?.ok_or(DomainError::NotFound("Invoice"))?;
        if invoice.get_status() != InvoiceStatus::Unpaid {
            return Err(DomainError::Conflict(format!("Invoice is {}", invoice.get_status())).into());
        }

        diesel::update(invoices::table.find(invoice_id.to_string()))
            .set((
                invoices::status.eq(InvoiceStatus::Paid),
                invoices::paid_at.eq(Some(Utc::now().naive_utc())),
            ))
            .execute(conn)?;

        find_invoice(conn, tenant_id, invoice_id)?.ok_or_else(|| DomainError::NotFound("Invoice").into())
    })?;

    info!("Invoice {} paid", invoice.get_number());
    Ok(invoice)
}

/// Voids an invoice that has not been paid
///
/// Voiding frees the booking to be invoiced again. Voiding a void invoice
/// leaves it as it is.
///
/// ### Errors
///
/// Returns `DomainError::Conflict` if the invoice is paid
#[instrument(skip(pool), fields(tenant_id = %tenant_id, invoice_id = %invoice_id))]
pub async fn void_invoice(pool: &DbPool, tenant_id: &str, invoice_id: &str) -> Result<Invoice> {
    let mut conn = pool.get()?;

    let invoice = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let invoice = find_invoice(conn, tenant_id, invoice_id)?.ok_or(DomainError::NotFound("Invoice"))?;
        match invoice.get_status() {
            InvoiceStatus::Paid => {
                return Err(DomainError::Conflict("Paid invoices cannot be voided".to_string()).into());
            }
            InvoiceStatus::Void => return Ok(invoice),
            InvoiceStatus::Unpaid => {}
        }

        diesel::update(invoices::table.find(invoice_id.to_string()))
            .set(invoices::status.eq(InvoiceStatus::Void))
            .execute(conn)?;

        find_invoice(conn, tenant_id, invoice_id)?.ok_or_else(|| DomainError::NotFound("Invoice").into())
    })?;

    info!("Invoice {} is void", invoice.get_number());
    Ok(invoice)
}
