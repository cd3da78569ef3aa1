use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::db::DbPool;
use crate::dto::InvoiceQueryDto;
use crate::errors::ApiError;
use crate::models::Invoice;
use crate::repo;
use crate::tenancy::TenantContext;

/// Handler for invoicing a booking
///
/// This function handles POST requests to `/bookings/{id}/invoice`. The
/// invoice is issued today and falls due after the configured number of
/// days.
///
/// ### Returns
///
/// The new invoice, or 409 if the booking is cancelled or already has an
/// open invoice
#[instrument(skip(pool, config), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn create_invoice_handler(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let issued_on = Utc::now().date_naive();
    let invoice = repo::create_invoice(&pool, &tenant.tenant_id, &booking_id, issued_on, config.invoice_due_days).await?;
    info!("Issued invoice {}", invoice.get_number());
    Ok(Json(invoice))
}

/// Handler for retrieving a specific invoice
///
/// This function handles GET requests to `/invoices/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, invoice_id = %invoice_id))]
pub async fn get_invoice_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(invoice_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    debug!("Retrieving invoice");
    let invoice = repo::get_invoice(&pool, &tenant.tenant_id, &invoice_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(invoice))
}

/// Handler for listing invoices
///
/// This function handles GET requests to `/invoices?status=`.
#[instrument(skip(pool, query), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_invoices_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<InvoiceQueryDto>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(repo::list_invoices(&pool, &tenant.tenant_id, query.status)?))
}

/// Handler for recording payment of an invoice
///
/// This function handles POST requests to `/invoices/{id}/pay`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, invoice_id = %invoice_id))]
pub async fn pay_invoice_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(invoice_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = repo::pay_invoice(&pool, &tenant.tenant_id, &invoice_id).await?;
    info!("Invoice {} paid", invoice.get_number());
    Ok(Json(invoice))
}

/// Handler for voiding an invoice
///
/// This function handles POST requests to `/invoices/{id}/void`. Paid
/// invoices cannot be voided.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, invoice_id = %invoice_id))]
pub async fn void_invoice_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(invoice_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = repo::void_invoice(&pool, &tenant.tenant_id, &invoice_id).await?;
    info!("Invoice {} voided", invoice.get_number());
    Ok(Json(invoice))
}
