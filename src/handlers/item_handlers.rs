use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{AvailabilityDto, CreateItemDto, DateRangeQueryDto, ItemQueryDto, UpdateItemDto, validate_booking_dates};
use crate::errors::ApiError;
use crate::models::{Booking, Item};
use crate::repo;
use crate::tenancy::TenantContext;

/// Handler for creating a new item
///
/// This function handles POST requests to `/items`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `tenant` - The tenant the request acts for
/// * `payload` - The request payload describing the item
///
/// ### Returns
///
/// The newly created item as JSON
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, name = %payload.name))]
pub async fn create_item_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateItemDto>,
) -> Result<Json<Item>, ApiError> {
    info!("Creating new item");

    payload.validate().map_err(ApiError::Validation)?;
    let item = repo::create_item(&pool, &tenant.tenant_id, payload).await?;

    info!("Successfully created item with id: {}", item.get_id());
    Ok(Json(item))
}

/// Handler for retrieving a specific item
///
/// This function handles GET requests to `/items/{id}`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `item_id` - The ID of the item to retrieve, extracted from the URL path
///
/// ### Returns
///
/// The requested item as JSON, or 404 if the tenant has no such item
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn get_item_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    // Extract the item ID from the URL path
    Path(item_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    debug!("Retrieving item");
    let item = repo::get_item(&pool, &tenant.tenant_id, &item_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(item))
}

/// Handler for listing items
///
/// This function handles GET requests to `/items?kind=&status=`.
///
/// ### Returns
///
/// The tenant's items matching the filters, ordered by name
#[instrument(skip(pool, query), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_items_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<ItemQueryDto>,
) -> Result<Json<Vec<Item>>, ApiError> {
    debug!("Listing items");
    let items = repo::list_items(&pool, &tenant.tenant_id, query.kind, query.status)?;
    info!("Returning {} items", items.len());
    Ok(Json(items))
}

/// Handler for updating an item
///
/// This function handles PUT requests to `/items/{id}`. Retiring an item is
/// done here by setting `status` to `retired`.
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn update_item_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateItemDto>,
) -> Result<Json<Item>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let item = repo::update_item(&pool, &tenant.tenant_id, &item_id, payload).await?;
    info!("Updated item with id: {}", item.get_id());
    Ok(Json(item))
}

/// Handler for deleting an item
///
/// This function handles DELETE requests to `/items/{id}`.
///
/// ### Returns
///
/// An empty JSON body on success; 409 if the item has bookings
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn delete_item_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(item_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    info!("Deleting item with id: {}", item_id);
    repo::delete_item(&pool, &tenant.tenant_id, &item_id).await?;
    Ok(Json(()))
}

/// Handler for an item's booking calendar
///
/// This function handles GET requests to `/items/{id}/bookings`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn list_item_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(item_id): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = repo::list_item_bookings(&pool, &tenant.tenant_id, &item_id)?;
    Ok(Json(bookings))
}

/// Handler for checking whether an item is free
///
/// This function handles GET requests to
/// `/items/{id}/availability?start_date=&end_date=`.
///
/// ### Returns
///
/// `available` and the blocking bookings in the way
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn item_availability_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(item_id): Path<String>,
    Query(range): Query<DateRangeQueryDto>,
) -> Result<Json<AvailabilityDto>, ApiError> {
    validate_booking_dates(range.start_date, range.end_date).map_err(ApiError::Validation)?;

    let conflicts = repo::check_availability(&pool, &tenant.tenant_id, &item_id, range.start_date, range.end_date)?;
    debug!("{} conflicting bookings", conflicts.len());

    Ok(Json(AvailabilityDto { available: conflicts.is_empty(), conflicts }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemKind, ItemStatus};
    use crate::repo::tests::{date, seed_booking, seed_customer, seed_item, seed_tenant, setup_test_db};

    fn boat() -> CreateItemDto {
        CreateItemDto {
            kind: ItemKind::Boat,
            name: "Sea Breeze".to_string(),
            registration: Some("HB-42".to_string()),
            owner_name: Some("J. Smith".to_string()),
            commission_rate: 0.3,
            daily_rate: 300.0,
            mileage: None,
        }
    }

    #[tokio::test]
    async fn test_create_item_handler() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;

        let result = create_item_handler(State(pool.clone()), TenantContext::new(tenant.get_id()), Json(boat()))
            .await
            .unwrap();

        let item = result.0;
        assert_eq!(item.get_name(), "Sea Breeze");
        assert_eq!(item.get_kind(), ItemKind::Boat);
        assert_eq!(item.get_commission_rate(), 0.3);
    }

    #[tokio::test]
    async fn test_create_item_handler_rejects_bad_rate() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;

        let payload = CreateItemDto { commission_rate: -0.1, ..boat() };
        let result = create_item_handler(State(pool), TenantContext::new(tenant.get_id()), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_item_handler_not_found() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;

        let result = get_item_handler(State(pool), TenantContext::new(tenant.get_id()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_retire_item_handler() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;
        let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

        let payload = UpdateItemDto { status: Some(ItemStatus::Retired), ..Default::default() };
        let updated = update_item_handler(State(pool.clone()), TenantContext::new(tenant.get_id()), Path(item.get_id()), Json(payload))
            .await
            .unwrap()
            .0;
        assert_eq!(updated.get_status(), ItemStatus::Retired);

        let query = ItemQueryDto { status: Some(ItemStatus::Available), ..Default::default() };
        let available = list_items_handler(State(pool), TenantContext::new(tenant.get_id()), Query(query))
            .await
            .unwrap()
            .0;
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn test_availability_handler() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;
        let item = seed_item(&pool, &tenant.get_id(), "Golf").await;
        let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;
        let booking = seed_booking(&pool, &tenant.get_id(), &item, &customer, "2026-07-01", "2026-07-05").await;

        let ctx = TenantContext::new(tenant.get_id());
        let range = DateRangeQueryDto { start_date: date("2026-07-05"), end_date: date("2026-07-09") };
        let free = item_availability_handler(State(pool.clone()), ctx.clone(), Path(item.get_id()), Query(range))
            .await
            .unwrap()
            .0;
        assert!(free.available);

        let range = DateRangeQueryDto { start_date: date("2026-06-28"), end_date: date("2026-07-02") };
        let busy = item_availability_handler(State(pool.clone()), ctx.clone(), Path(item.get_id()), Query(range))
            .await
            .unwrap()
            .0;
        assert!(!busy.available);
        assert_eq!(busy.conflicts[0].get_id(), booking.get_id());

        let range = DateRangeQueryDto { start_date: date("2026-07-02"), end_date: date("2026-07-02") };
        let result = item_availability_handler(State(pool), ctx, Path(item.get_id()), Query(range)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
