use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ItemKind, ItemStatus};

/// Represents a rentable asset
///
/// This struct maps directly to the `items` table in the database. An item
/// may be a vehicle, a property, a boat or anything else a tenant rents out.
/// Items managed on behalf of a third-party owner carry the owner's name and
/// the commission rate the tenant keeps from each booking.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    /// Unique identifier for the item (UUID v4 as string)
    id: String,

    /// The tenant that manages this item
    tenant_id: String,

    kind: ItemKind,

    /// Display name, e.g. "VW Golf (blue)" or "Seaview Apartment 3"
    name: String,

    /// Licence plate, hull number or property reference
    registration: Option<String>,

    /// Name of the third-party owner, if the tenant does not own the item
    owner_name: Option<String>,

    /// Share of booking revenue kept by the tenant, between 0 and 1
    commission_rate: f64,

    /// Price per night used when a booking does not specify its own price
    daily_rate: f64,

    /// Last known odometer reading (vehicles and boats)
    mileage: Option<i32>,

    status: ItemStatus,

    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Item {
    /// Creates a new, available item
    ///
    /// ### Arguments
    ///
    /// * `tenant_id` - The owning tenant
    /// * `kind` - What sort of asset this is
    /// * `name` - The display name
    /// * `daily_rate` - Price per night
    ///
    /// ### Returns
    ///
    /// A new `Item` with no owner, no commission and no mileage; use the
    /// `with_*` builders to fill those in
    pub fn new(tenant_id: String, kind: ItemKind, name: String, daily_rate: f64) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            kind,
            name,
            registration: None,
            owner_name: None,
            commission_rate: 0.0,
            daily_rate,
            mileage: None,
            status: ItemStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_registration(mut self, registration: Option<String>) -> Self {
        self.registration = registration;
        self
    }

    pub fn with_owner(mut self, owner_name: Option<String>, commission_rate: f64) -> Self {
        self.owner_name = owner_name;
        self.commission_rate = commission_rate;
        self
    }

    pub fn with_mileage(mut self, mileage: Option<i32>) -> Self {
        self.mileage = mileage;
        self
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_tenant_id(&self) -> String {
        self.tenant_id.clone()
    }

    pub fn get_kind(&self) -> ItemKind {
        self.kind
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_registration(&self) -> Option<String> {
        self.registration.clone()
    }

    pub fn get_owner_name(&self) -> Option<String> {
        self.owner_name.clone()
    }

    pub fn get_commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn get_daily_rate(&self) -> f64 {
        self.daily_rate
    }

    pub fn get_mileage(&self) -> Option<i32> {
        self.mileage
    }

    pub fn get_status(&self) -> ItemStatus {
        self.status
    }

    /// Whether new bookings may be taken for this item
    pub fn is_bookable(&self) -> bool {
        self.status != ItemStatus::Retired
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
