use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::db::DbPool;
use crate::dto::{BookingQueryDto, CreateBookingDto, UpdateBookingDto, UpdateBookingStatusDto};
use crate::errors::ApiError;
use crate::models::{Booking, BookingStatus};
use crate::notify;
use crate::repo;
use crate::tenancy::TenantContext;
use crate::AppState;

/// Emails the customer about a booking, in the background
///
/// Failing to load the booking's details only costs the email, never the
/// request that triggered it.
fn notify_customer(state: &AppState, tenant_id: &str, booking: &Booking) {
    match repo::get_booking_details(&state.pool, tenant_id, &booking.get_id()) {
        Ok(Some(details)) => {
            match notify::booking_email(&state.config.mail_from, &details.customer, &details.item, &details.booking) {
                Some(email) => {
                    notify::dispatch(state.mailer.clone(), email);
                }
                None => debug!("Customer has no email address, skipping notification"),
            }
        }
        Ok(None) => warn!("Booking {} vanished before notification", booking.get_id()),
        Err(e) => warn!("Could not load booking {} for notification: {:#}", booking.get_id(), e),
    }
}

/// Handler for creating a new booking
///
/// This function handles POST requests to `/bookings`. The overlap check and
/// the insert happen atomically in the repository; a clash with an existing
/// pending, confirmed or active booking of the item yields 409.
///
/// ### Arguments
///
/// * `state` - The application state, for the pool and the mailer
/// * `tenant` - The tenant the request acts for
/// * `payload` - The request payload describing the booking
///
/// ### Returns
///
/// The newly created booking as JSON
#[instrument(skip(state, payload), fields(tenant_id = %tenant.tenant_id, item_id = %payload.item_id))]
pub async fn create_booking_handler(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateBookingDto>,
) -> Result<Json<Booking>, ApiError> {
    info!("Creating booking from {} to {}", payload.start_date, payload.end_date);

    payload.validate().map_err(ApiError::Validation)?;
    let booking = repo::create_booking(&state.pool, &tenant.tenant_id, payload).await?;

    notify_customer(&state, &tenant.tenant_id, &booking);

    info!("Successfully created booking with id: {}", booking.get_id());
    Ok(Json(booking))
}

/// Handler for retrieving a specific booking
///
/// This function handles GET requests to `/bookings/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn get_booking_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    debug!("Retrieving booking");
    let booking = repo::get_booking(&pool, &tenant.tenant_id, &booking_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(booking))
}

/// Handler for listing bookings
///
/// This function handles GET requests to
/// `/bookings?status=&status=&item_id=&customer_id=&from=&to=`.
/// `status` may be repeated.
#[instrument(skip(pool, query), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<BookingQueryDto>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if to <= from {
            return Err(ApiError::Validation("to must be after from".to_string()));
        }
    }

    let bookings = repo::list_bookings(&pool, &tenant.tenant_id, &query)?;
    info!("Returning {} bookings", bookings.len());
    Ok(Json(bookings))
}

/// Handler for editing a booking
///
/// This function handles PUT requests to `/bookings/{id}`. Changing the
/// item or dates re-runs the overlap check, ignoring the booking itself.
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn update_booking_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingDto>,
) -> Result<Json<Booking>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let booking = repo::update_booking(&pool, &tenant.tenant_id, &booking_id, payload).await?;
    info!("Updated booking with id: {}", booking.get_id());
    Ok(Json(booking))
}

/// Handler for moving a booking through its lifecycle
///
/// This function handles POST requests to `/bookings/{id}/status`.
/// Confirming a booking emails the customer.
///
/// ### Returns
///
/// The updated booking, or 409 if the transition is not allowed
#[instrument(skip(state, payload), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id, status = %payload.status))]
pub async fn update_booking_status_handler(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusDto>,
) -> Result<Json<Booking>, ApiError> {
    let booking = repo::update_booking_status(&state.pool, &tenant.tenant_id, &booking_id, payload.status).await?;

    if booking.get_status() == BookingStatus::Confirmed {
        notify_customer(&state, &tenant.tenant_id, &booking);
    }

    Ok(Json(booking))
}

/// Handler for deleting a booking
///
/// This function handles DELETE requests to `/bookings/{id}`. Only pending
/// or cancelled bookings can be deleted.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, booking_id = %booking_id))]
pub async fn delete_booking_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(booking_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    info!("Deleting booking with id: {}", booking_id);
    repo::delete_booking(&pool, &tenant.tenant_id, &booking_id).await?;
    Ok(Json(()))
}
