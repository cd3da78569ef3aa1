use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person or company that rents items from a tenant
///
/// This struct maps directly to the `customers` table. Contact details are
/// optional; a customer without an email simply receives no notifications.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Customer {
    /// Unique identifier for the customer (UUID v4 as string)
    id: String,

    /// The tenant this customer belongs to
    tenant_id: String,

    /// Full name or company name
    name: String,

    email: Option<String>,
    phone: Option<String>,

    /// Driving licence or other identity document number
    license_number: Option<String>,

    /// Free-form staff notes
    notes: Option<String>,

    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Customer {
    /// Creates a new customer with a fresh id and timestamps
    pub fn new(
        tenant_id: String,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        license_number: Option<String>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            name,
            email,
            phone,
            license_number,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_tenant_id(&self) -> String {
        self.tenant_id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_email(&self) -> Option<String> {
        self.email.clone()
    }

    pub fn get_phone(&self) -> Option<String> {
        self.phone.clone()
    }

    pub fn get_license_number(&self) -> Option<String> {
        self.license_number.clone()
    }

    pub fn get_notes(&self) -> Option<String> {
        self.notes.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
