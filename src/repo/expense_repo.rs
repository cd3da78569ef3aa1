use crate::db::{DbPool, ExecuteWithRetry};
use crate::dto::{CreateExpenseDto, ExpenseQueryDto};
use crate::errors::DomainError;
use crate::models::Expense;
use crate::schema::expenses;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::item_repo::find_item;

/// Logs an expense, optionally attributed to one of the tenant's items
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if `item_id` is given but the item does
/// not exist in the tenant
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, category = %dto.category, amount = dto.amount))]
pub async fn create_expense(pool: &DbPool, tenant_id: &str, dto: CreateExpenseDto) -> Result<Expense> {
    debug!("Logging expense");

    let mut conn = pool.get()?;

    if let Some(item_id) = &dto.item_id {
        find_item(&mut conn, tenant_id, item_id)?.ok_or(DomainError::NotFound("Item"))?;
    }

    let expense = Expense::new(
        tenant_id.to_string(),
        dto.item_id,
        dto.category,
        dto.amount,
        dto.description,
        dto.incurred_on,
    );

    diesel::insert_into(expenses::table)
        .values(expense.clone())
        .execute_with_retry(&mut conn)
        .await?;

    info!("Logged expense with id: {}", expense.get_id());
    Ok(expense)
}

/// Lists the tenant's expenses, newest first
///
/// `from` is inclusive and `to` exclusive.
#[instrument(skip(pool, filter), fields(tenant_id = %tenant_id))]
pub fn list_expenses(pool: &DbPool, tenant_id: &str, filter: &ExpenseQueryDto) -> Result<Vec<Expense>> {
    let conn = &mut pool.get()?;

    let mut query = expenses::table
        .filter(expenses::tenant_id.eq(tenant_id))
        .into_boxed();
    if let Some(item_id) = &filter.item_id {
        query = query.filter(expenses::item_id.eq(item_id.clone()));
    }
    if let Some(from) = filter.from {
        query = query.filter(expenses::incurred_on.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(expenses::incurred_on.lt(to));
    }

    let result = query
        .order((expenses::incurred_on.desc(), expenses::created_at.desc()))
        .load::<Expense>(conn)?;
    debug!("Retrieved {} expenses", result.len());
    Ok(result)
}

/// Deletes an expense of the tenant
#[instrument(skip(pool), fields(tenant_id = %tenant_id, expense_id = %expense_id))]
pub async fn delete_expense(pool: &DbPool, tenant_id: &str, expense_id: &str) -> Result<()> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        expenses::table
            .filter(expenses::tenant_id.eq(tenant_id.to_string()))
            .filter(expenses::id.eq(expense_id.to_string())),
    )
    .execute_with_retry(&mut conn)
    .await?;

    if deleted == 0 {
        return Err(DomainError::NotFound("Expense").into());
    }
    Ok(())
}
