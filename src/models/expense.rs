use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExpenseCategory;

/// Money spent by a tenant, optionally attributed to one item
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Expense {
    id: String,
    tenant_id: String,
    item_id: Option<String>,
    category: ExpenseCategory,
    amount: f64,
    description: String,
    incurred_on: NaiveDate,
    created_at: NaiveDateTime,
}

impl Expense {
    pub fn new(
        tenant_id: String,
        item_id: Option<String>,
        category: ExpenseCategory,
        amount: f64,
        description: String,
        incurred_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            item_id,
            category,
            amount,
            description,
            incurred_on,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_item_id(&self) -> Option<String> {
        self.item_id.clone()
    }

    pub fn get_category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_incurred_on(&self) -> NaiveDate {
        self.incurred_on
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
