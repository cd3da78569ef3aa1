use crate::db::DbPool;
use crate::dto::CreateMaintenanceDto;
use crate::errors::DomainError;
use crate::models::MaintenanceRecord;
use crate::schema::maintenance_records;
use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::item_repo::{advance_mileage, find_item};

/// Records maintenance performed on an item
///
/// If the record carries a mileage reading higher than the item's, the
/// item's mileage is advanced in the same transaction.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the item does not exist in the tenant
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, item_id = %item_id))]
pub async fn create_maintenance(
    pool: &DbPool,
    tenant_id: &str,
    item_id: &str,
    dto: CreateMaintenanceDto,
) -> Result<MaintenanceRecord> {
    debug!("Recording maintenance");

    let mut conn = pool.get()?;

    let record = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        find_item(conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;

        let record = MaintenanceRecord::new(
            tenant_id.to_string(),
            item_id.to_string(),
            dto.description,
            dto.cost,
            dto.performed_on,
            dto.next_due_on,
            dto.mileage,
        );
        diesel::insert_into(maintenance_records::table)
            .values(record.clone())
            .execute(conn)?;

        if let Some(mileage) = record.get_mileage() {
            advance_mileage(conn, item_id, mileage)?;
        }
        Ok(record)
    })?;

    info!("Recorded maintenance with id: {}", record.get_id());
    Ok(record)
}

/// Lists an item's maintenance history, most recent first
#[instrument(skip(pool), fields(tenant_id = %tenant_id, item_id = %item_id))]
pub fn list_maintenance(pool: &DbPool, tenant_id: &str, item_id: &str) -> Result<Vec<MaintenanceRecord>> {
    let conn = &mut pool.get()?;
    find_item(conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;

    let result = maintenance_records::table
        .filter(maintenance_records::tenant_id.eq(tenant_id))
        .filter(maintenance_records::item_id.eq(item_id))
        .order(maintenance_records::performed_on.desc())
        .load::<MaintenanceRecord>(conn)?;
    Ok(result)
}

/// Lists maintenance records whose next service falls on or before
/// `today + within_days`, soonest first
///
/// Overdue records are included. A window reaching past year 9999 covers
/// every scheduled record.
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub fn list_due_maintenance(pool: &DbPool, tenant_id: &str, today: NaiveDate, within_days: u64) -> Result<Vec<MaintenanceRecord>> {
    // Dates are stored as text, which only orders correctly for four-digit years
    let horizon = today
        .checked_add_days(Days::new(within_days))
        .filter(|d| d.year() <= 9999);

    let conn = &mut pool.get()?;
    let mut query = maintenance_records::table
        .filter(maintenance_records::tenant_id.eq(tenant_id))
        .filter(maintenance_records::next_due_on.is_not_null())
        .into_boxed();
    if let Some(horizon) = horizon {
        query = query.filter(maintenance_records::next_due_on.le(horizon));
    }

    let result = query
        .order(maintenance_records::next_due_on.asc())
        .load::<MaintenanceRecord>(conn)?;

    debug!("Found {} maintenance records due within {} days", result.len(), within_days);
    Ok(result)
}

#[cfg(test)]
mod tests;
