use crate::db::DbPool;
use crate::dto::CreateInspectionDto;
use crate::errors::DomainError;
use crate::models::{Inspection, InspectionKind, InspectionPhoto, InspectionWithPhotos};
use crate::schema::{inspection_photos, inspections};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::booking_repo::{BookingDetails, find_booking, find_booking_details};
use super::item_repo::advance_mileage;

/// A booking with its pickup and return inspections, when recorded
#[derive(Debug, Clone)]
pub struct InspectionPair {
    pub details: BookingDetails,
    pub pickup: Option<InspectionWithPhotos>,
    pub ret: Option<InspectionWithPhotos>,
}

fn attach_photos(conn: &mut SqliteConnection, list: Vec<Inspection>) -> Result<Vec<InspectionWithPhotos>> {
    let ids: Vec<String> = list.iter().map(|i| i.get_id()).collect();
    let photos = inspection_photos::table
        .filter(inspection_photos::inspection_id.eq_any(ids))
        .order((inspection_photos::position.asc(), inspection_photos::created_at.asc()))
        .load::<InspectionPhoto>(conn)?;

    let result = list
        .into_iter()
        .map(|inspection| {
            let photos = photos
                .iter()
                .filter(|p| p.get_inspection_id() == inspection.get_id())
                .cloned()
                .collect();
            InspectionWithPhotos { inspection, photos }
        })
        .collect();
    Ok(result)
}

/// Records a pickup or return inspection with its photos
///
/// A return inspection that carries a mileage reading also advances the
/// item's mileage.
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the booking does not exist in the
/// tenant, or `DomainError::Conflict` if an inspection of the same kind was
/// already recorded for it
#[instrument(skip(pool, dto), fields(tenant_id = %tenant_id, booking_id = %booking_id, kind = %dto.kind))]
pub async fn create_inspection(pool: &DbPool, tenant_id: &str, booking_id: &str, dto: CreateInspectionDto) -> Result<InspectionWithPhotos> {
    debug!("Recording inspection with {} photo(s)", dto.photos.len());

    let mut conn = pool.get()?;

    let created = conn.immediate_transaction::<_, anyhow::Error, _>(|conn| {
        let booking = find_booking(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;

        let existing = inspections::table
            .filter(inspections::booking_id.eq(booking_id))
            .filter(inspections::kind.eq(dto.kind))
            .count()
            .get_result::<i64>(conn)?;
        if existing > 0 {
            return Err(DomainError::Conflict(format!("Booking already has a {} inspection", dto.kind)).into());
        }

        let inspection = Inspection::new(
            tenant_id.to_string(),
            booking_id.to_string(),
            dto.kind,
            dto.mileage,
            dto.fuel_level,
            dto.notes,
        );
        diesel::insert_into(inspections::table)
            .values(inspection.clone())
            .execute(conn)?;

        let photos: Vec<InspectionPhoto> = dto
            .photos
            .into_iter()
            .map(|p| InspectionPhoto::new(inspection.get_id(), p.position, p.url, p.damage_noted))
            .collect();
        if !photos.is_empty() {
            diesel::insert_into(inspection_photos::table)
                .values(photos.clone())
                .execute(conn)?;
        }

        if let (InspectionKind::Return, Some(mileage)) = (inspection.get_kind(), inspection.get_mileage()) {
            advance_mileage(conn, &booking.get_item_id(), mileage)?;
        }

        Ok(InspectionWithPhotos { inspection, photos })
    })?;

    info!("Recorded inspection with id: {}", created.inspection.get_id());
    Ok(created)
}

/// Lists a booking's inspections with their photos, pickup first
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub fn list_inspections(pool: &DbPool, tenant_id: &str, booking_id: &str) -> Result<Vec<InspectionWithPhotos>> {
    let conn = &mut pool.get()?;
    find_booking(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;
    load_for_booking(conn, tenant_id, booking_id)
}

fn load_for_booking(conn: &mut SqliteConnection, tenant_id: &str, booking_id: &str) -> Result<Vec<InspectionWithPhotos>> {
    let list = inspections::table
        .filter(inspections::tenant_id.eq(tenant_id))
        .filter(inspections::booking_id.eq(booking_id))
        // "pickup" sorts before "return"
        .order((inspections::kind.asc(), inspections::created_at.asc()))
        .load::<Inspection>(conn)?;
    attach_photos(conn, list)
}

/// Retrieves an inspection of the tenant with its photos
#[instrument(skip(pool), fields(tenant_id = %tenant_id, inspection_id = %inspection_id))]
pub fn get_inspection(pool: &DbPool, tenant_id: &str, inspection_id: &str) -> Result<Option<InspectionWithPhotos>> {
    let conn = &mut pool.get()?;

    let found = inspections::table
        .filter(inspections::tenant_id.eq(tenant_id))
        .filter(inspections::id.eq(inspection_id))
        .first::<Inspection>(conn)
        .optional()?;

    Ok(attach_photos(conn, found.into_iter().collect())?.pop())
}

/// Loads a booking with its pickup and return inspections
///
/// ### Errors
///
/// Returns `DomainError::NotFound` if the booking does not exist in the tenant
#[instrument(skip(pool), fields(tenant_id = %tenant_id, booking_id = %booking_id))]
pub fn get_inspection_pair(pool: &DbPool, tenant_id: &str, booking_id: &str) -> Result<InspectionPair> {
    let conn = &mut pool.get()?;
    let details = find_booking_details(conn, tenant_id, booking_id)?.ok_or(DomainError::NotFound("Booking"))?;

    let mut pickup = None;
    let mut ret = None;
    for inspection in load_for_booking(conn, tenant_id, booking_id)? {
        match inspection.inspection.get_kind() {
            InspectionKind::Pickup => pickup = Some(inspection),
            InspectionKind::Return => ret = Some(inspection),
        }
    }

    Ok(InspectionPair { details, pickup, ret })
}
