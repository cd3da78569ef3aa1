use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::comparison::{compare_inspections, InspectionComparison};
use crate::db::DbPool;
use crate::documents::render_inspection_report;
use crate::dto::CreateInspectionDto;
use crate::errors::ApiError;
use crate::models::InspectionWithPhotos;
use crate::repo::{self, InspectionPair};
use crate::tenancy::TenantContext;

/// Handler for recording a pickup or return inspection
///
/// This function handles POST requests to `/bookings/{id}/inspections`.
///
/// ### Returns
///
/// The inspection with its photos, or 409 if one of the same kind exists
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id, kind = %payload.kind))]
pub async fn create_inspection_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
    Json(payload): Json<CreateInspectionDto>,
) -> Result<Json<InspectionWithPhotos>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let inspection = repo::create_inspection(&pool, &tenant.tenant_id, &booking_id, payload).await?;
    info!("Recorded inspection with {} photo(s)", inspection.photos.len());
    Ok(Json(inspection))
}

/// Handler for a booking's inspections
///
/// This function handles GET requests to `/bookings/{id}/inspections`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn list_inspections_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Json<Vec<InspectionWithPhotos>>, ApiError> {
    Ok(Json(repo::list_inspections(&pool, &tenant.tenant_id, &booking_id)?))
}

/// Handler for retrieving one inspection with its photos
///
/// This function handles GET requests to `/inspections/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, inspection_id = %inspection_id))]
pub async fn get_inspection_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(inspection_id): Path<String>,
) -> Result<Json<InspectionWithPhotos>, ApiError> {
    let inspection = repo::get_inspection(&pool, &tenant.tenant_id, &inspection_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(inspection))
}

/// Loads a booking's inspections, requiring both pickup and return
fn complete_pair(pool: &DbPool, tenant_id: &str, booking_id: &str) -> Result<(InspectionPair, InspectionComparison), ApiError> {
    let pair = repo::get_inspection_pair(pool, tenant_id, booking_id)?;
    let comparison = match (&pair.pickup, &pair.ret) {
        (Some(pickup), Some(ret)) => compare_inspections(pickup, ret),
        _ => {
            debug!("Booking {} lacks a pickup or return inspection", booking_id);
            return Err(ApiError::NotFound);
        }
    };
    Ok((pair, comparison))
}

/// Handler for comparing pickup and return
///
/// This function handles GET requests to `/bookings/{id}/inspections/compare`.
///
/// ### Returns
///
/// Photos paired by position with new damage flagged, or 404 unless both
/// inspections were recorded
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn compare_inspections_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Json<InspectionComparison>, ApiError> {
    let (_, comparison) = complete_pair(&pool, &tenant.tenant_id, &booking_id)?;
    if comparison.has_new_damage() {
        info!("New damage at {}", comparison.new_damage.join(", "));
    }
    Ok(Json(comparison))
}

/// Handler for the printable inspection report
///
/// This function handles GET requests to `/bookings/{id}/inspections/report`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn inspection_report_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let (pair, comparison) = complete_pair(&pool, &tenant.tenant_id, &booking_id)?;
    let (Some(pickup), Some(ret)) = (&pair.pickup, &pair.ret) else {
        return Err(ApiError::NotFound);
    };

    let details = &pair.details;
    let html = render_inspection_report(
        &details.tenant,
        &details.booking,
        &details.customer,
        &details.item,
        pickup,
        ret,
        &comparison,
    )?;
    Ok(Html(html))
}
