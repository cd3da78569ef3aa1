use crate::db::DbPool;
use crate::models::{Booking, BookingStatus, Expense, Item};
use crate::reports::{CommissionLine, OwnerStatement, RevenueSummary, aggregate_commissions, summarize, summarize_by_owner};
use crate::schema::{bookings, expenses, items};
use anyhow::Result;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Rows a commission report is computed from
struct CommissionRows {
    bookings: Vec<(Booking, Item)>,
    expenses: Vec<(Expense, Item)>,
}

/// Loads revenue bookings starting in `[from, to)` and item expenses
/// incurred in the same period, each with its item
fn load_commission_rows(conn: &mut SqliteConnection, tenant_id: &str, from: NaiveDate, to: NaiveDate) -> QueryResult<CommissionRows> {
    let bookings = bookings::table
        .inner_join(items::table)
        .filter(bookings::tenant_id.eq(tenant_id))
        .filter(bookings::status.eq_any(BookingStatus::REVENUE))
        .filter(bookings::start_date.ge(from))
        .filter(bookings::start_date.lt(to))
        .select((Booking::as_select(), Item::as_select()))
        .load::<(Booking, Item)>(conn)?;

    let expenses = expenses::table
        .inner_join(items::table)
        .filter(expenses::tenant_id.eq(tenant_id))
        .filter(expenses::incurred_on.ge(from))
        .filter(expenses::incurred_on.lt(to))
        .select((Expense::as_select(), Item::as_select()))
        .load::<(Expense, Item)>(conn)?;

    debug!("Loaded {} bookings and {} item expenses", bookings.len(), expenses.len());
    Ok(CommissionRows { bookings, expenses })
}

/// Commission lines per (month, owner, item) for bookings starting in `[from, to)`
#[instrument(skip(pool), fields(tenant_id = %tenant_id, from = %from, to = %to))]
pub fn commission_report(pool: &DbPool, tenant_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<CommissionLine>> {
    let conn = &mut pool.get()?;
    let rows = load_commission_rows(conn, tenant_id, from, to)?;
    Ok(aggregate_commissions(&rows.bookings, &rows.expenses))
}

/// Owner statements for bookings starting in `[from, to)`
#[instrument(skip(pool), fields(tenant_id = %tenant_id, from = %from, to = %to))]
pub fn owner_report(pool: &DbPool, tenant_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<OwnerStatement>> {
    let lines = commission_report(pool, tenant_id, from, to)?;
    Ok(summarize_by_owner(&lines))
}

/// Tenant-wide revenue summary for `[from, to)`
///
/// Unlike the commission lines, the expense total here includes expenses
/// not tied to any item.
#[instrument(skip(pool), fields(tenant_id = %tenant_id, from = %from, to = %to))]
pub fn summary_report(pool: &DbPool, tenant_id: &str, from: NaiveDate, to: NaiveDate) -> Result<RevenueSummary> {
    let conn = &mut pool.get()?;
    let rows = load_commission_rows(conn, tenant_id, from, to)?;
    let lines = aggregate_commissions(&rows.bookings, &rows.expenses);

    let all_expenses = expenses::table
        .filter(expenses::tenant_id.eq(tenant_id))
        .filter(expenses::incurred_on.ge(from))
        .filter(expenses::incurred_on.lt(to))
        .load::<Expense>(conn)?;

    Ok(summarize(from, to, &lines, &all_expenses))
}

#[cfg(test)]
mod tests;
