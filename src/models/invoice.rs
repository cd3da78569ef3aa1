use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InvoiceStatus;

/// A bill issued for a booking
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::invoices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Invoice {
    id: String,
    tenant_id: String,
    booking_id: String,
    /// Human-facing number, unique per tenant, e.g. `INV-2026-0007`
    number: String,
    amount: f64,
    status: InvoiceStatus,
    issued_on: NaiveDate,
    due_on: NaiveDate,
    paid_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl Invoice {
    pub fn new(
        tenant_id: String,
        booking_id: String,
        number: String,
        amount: f64,
        issued_on: NaiveDate,
        due_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            booking_id,
            number,
            amount,
            status: InvoiceStatus::Unpaid,
            issued_on,
            due_on,
            paid_at: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_booking_id(&self) -> String {
        self.booking_id.clone()
    }

    pub fn get_number(&self) -> String {
        self.number.clone()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn get_issued_on(&self) -> NaiveDate {
        self.issued_on
    }

    pub fn get_due_on(&self) -> NaiveDate {
        self.due_on
    }

    pub fn get_paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at.map(|t| DateTime::from_naive_utc_and_offset(t, Utc))
    }

    /// Unpaid and past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Unpaid && today > self.due_on
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// Formats the invoice number for the `sequence`-th invoice of a year
pub fn invoice_number(issued_on: NaiveDate, sequence: i64) -> String {
    format!("INV-{}-{:04}", issued_on.year(), sequence)
}

/// Prefix shared by every invoice number issued in the same year
pub fn invoice_number_prefix(issued_on: NaiveDate) -> String {
    format!("INV-{}-", issued_on.year())
}
