use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookingStatus;

/// Represents a reservation of one item by one customer
///
/// This struct maps directly to the `bookings` table in the database.
/// Date ranges are half-open: the item is occupied from `start_date`
/// (inclusive) up to `end_date` (exclusive), so a booking ending on a given
/// day never conflicts with one starting on the same day.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    /// Unique identifier for the booking (UUID v4 as string)
    id: String,

    /// The tenant that owns this booking
    tenant_id: String,

    /// The item being rented
    item_id: String,

    /// The customer renting the item
    customer_id: String,

    /// First occupied day
    start_date: NaiveDate,

    /// Day the item is handed back; not occupied by this booking
    end_date: NaiveDate,

    /// Where the booking is in its lifecycle
    status: BookingStatus,

    /// Agreed price for the whole stay
    total_price: f64,

    notes: Option<String>,

    /// When this booking was created
    created_at: NaiveDateTime,

    /// When this booking was last updated
    updated_at: NaiveDateTime,
}

impl Booking {
    /// Creates a new pending booking
    ///
    /// ### Arguments
    ///
    /// * `tenant_id` - The owning tenant
    /// * `item_id` - The item being rented
    /// * `customer_id` - The renting customer
    /// * `start_date` - First occupied day
    /// * `end_date` - Hand-back day, strictly after `start_date`
    /// * `total_price` - Agreed price
    ///
    /// ### Returns
    ///
    /// A new `Booking` in the `pending` status
    pub fn new(
        tenant_id: String,
        item_id: String,
        customer_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: f64,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            item_id,
            customer_id,
            start_date,
            end_date,
            status: BookingStatus::Pending,
            total_price,
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

    pub fn get_item_id(&self) -> String {
        self.item_id.clone()
    }

    pub fn set_item_id(&mut self, item_id: String) {
        self.item_id = item_id;
        self.updated_at = Utc::now().naive_utc();
    }

    pub fn get_customer_id(&self) -> String {
        self.customer_id.clone()
    }

    pub fn get_start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn get_end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Moves the booking to a new date range
    pub fn set_dates(&mut self, start_date: NaiveDate, end_date: NaiveDate) {
        self.start_date = start_date;
        self.end_date = end_date;
        self.updated_at = Utc::now().naive_utc();
    }

    /// Number of nights covered by the booking
    pub fn get_nights(&self) -> i64 {
        nights(self.start_date, self.end_date)
    }

    pub fn get_status(&self) -> BookingStatus {
        self.status
    }

    /// Sets the status without checking the transition; callers enforce
    /// `BookingStatus::can_transition_to`
    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.updated_at = Utc::now().naive_utc();
    }

    pub fn get_total_price(&self) -> f64 {
        self.total_price
    }

    pub fn set_total_price(&mut self, total_price: f64) {
        self.total_price = total_price;
        self.updated_at = Utc::now().naive_utc();
    }

    pub fn get_notes(&self) -> Option<String> {
        self.notes.clone()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.updated_at = Utc::now().naive_utc();
    }

    /// Whether this booking occupies any day of `[start, end)`
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        ranges_overlap(self.start_date, self.end_date, start, end)
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}

/// Whether the half-open ranges `[a_start, a_end)` and `[b_start, b_end)`
/// share at least one day
pub fn ranges_overlap(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start < b_end && b_start < a_end
}

/// Number of nights between two dates; zero or negative for invalid ranges
pub fn nights(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
