use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserRole;

/// A staff member of a tenant
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    id: String,
    tenant_id: String,
    email: String,
    name: String,
    role: UserRole,
    created_at: NaiveDateTime,
}

impl User {
    pub fn new(tenant_id: String, email: String, name: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            email,
            name,
            role,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_tenant_id(&self) -> String {
        self.tenant_id.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_role(&self) -> UserRole {
        self.role
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
