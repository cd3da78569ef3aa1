use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InspectionKind;

/// Condition check of an item at pickup or return
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::inspections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Inspection {
    id: String,
    tenant_id: String,
    booking_id: String,
    kind: InspectionKind,
    mileage: Option<i32>,
    /// Fuel or charge level in percent
    fuel_level: Option<i32>,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

impl Inspection {
    pub fn new(
        tenant_id: String,
        booking_id: String,
        kind: InspectionKind,
        mileage: Option<i32>,
        fuel_level: Option<i32>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            booking_id,
            kind,
            mileage,
            fuel_level,
            notes,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_booking_id(&self) -> String {
        self.booking_id.clone()
    }

    pub fn get_kind(&self) -> InspectionKind {
        self.kind
    }

    pub fn get_mileage(&self) -> Option<i32> {
        self.mileage
    }

    pub fn get_fuel_level(&self) -> Option<i32> {
        self.fuel_level
    }

    pub fn get_notes(&self) -> Option<String> {
        self.notes.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// One photo taken during an inspection
///
/// `position` names the angle or spot ("front-left", "dashboard", "kitchen")
/// so pickup and return photos can be paired. The image itself lives in
/// object storage; only its URL is kept here.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::inspection_photos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InspectionPhoto {
    id: String,
    inspection_id: String,
    position: String,
    url: String,
    damage_noted: bool,
    created_at: NaiveDateTime,
}

impl InspectionPhoto {
    pub fn new(inspection_id: String, position: String, url: String, damage_noted: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            inspection_id,
            position,
            url,
            damage_noted,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_inspection_id(&self) -> String {
        self.inspection_id.clone()
    }

    pub fn get_position(&self) -> String {
        self.position.clone()
    }

    pub fn get_url(&self) -> String {
        self.url.clone()
    }

    pub fn get_damage_noted(&self) -> bool {
        self.damage_noted
    }
}

/// An inspection together with its photos, as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionWithPhotos {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub photos: Vec<InspectionPhoto>,
}
