use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A service, repair or inspection performed on an item
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::maintenance_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MaintenanceRecord {
    id: String,
    tenant_id: String,
    item_id: String,
    description: String,
    cost: f64,
    performed_on: NaiveDate,
    /// When the next service of this kind is due, if it recurs
    next_due_on: Option<NaiveDate>,
    /// Odometer reading at the time of the work
    mileage: Option<i32>,
    created_at: NaiveDateTime,
}

impl MaintenanceRecord {
    pub fn new(
        tenant_id: String,
        item_id: String,
        description: String,
        cost: f64,
        performed_on: NaiveDate,
        next_due_on: Option<NaiveDate>,
        mileage: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            item_id,
            description,
            cost,
            performed_on,
            next_due_on,
            mileage,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_item_id(&self) -> String {
        self.item_id.clone()
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_cost(&self) -> f64 {
        self.cost
    }

    pub fn get_performed_on(&self) -> NaiveDate {
        self.performed_on
    }

    pub fn get_next_due_on(&self) -> Option<NaiveDate> {
        self.next_due_on
    }

    pub fn get_mileage(&self) -> Option<i32> {
        self.mileage
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
