use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    Booking, BookingStatus, ExpenseCategory, InspectionKind, InvoiceStatus, ItemKind, ItemStatus,
    UserRole, is_valid_slug,
};

/// Data transfer object for creating a new tenant
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTenantDto {
    pub name: String,
    /// Unique, URL-safe handle
    pub slug: String,
}

impl CreateTenantDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !is_valid_slug(&self.slug) {
            return Err("slug must be 2-64 lowercase letters, digits or dashes".to_string());
        }
        Ok(())
    }
}

/// Data transfer object for creating a staff user
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("email must be a valid address".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Data transfer object for creating a new customer
///
/// Only the name is required; contact fields may be filled in later.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CreateCustomerDto {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateCustomerDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        validate_email(self.email.as_deref())
    }
}

/// Data transfer object for updating a customer
///
/// Fields left out of the request keep their current value.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateCustomerDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub notes: Option<String>,
}

impl UpdateCustomerDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        validate_email(self.email.as_deref())
    }
}

fn validate_email(email: Option<&str>) -> Result<(), String> {
    match email {
        Some(e) if !e.contains('@') => Err("email must be a valid address".to_string()),
        _ => Ok(()),
    }
}

/// Query parameters for searching customers
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CustomerQueryDto {
    /// Case-insensitive substring of the name or email
    pub q: Option<String>,
}

/// Data transfer object for creating a new item
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateItemDto {
    pub kind: ItemKind,
    pub name: String,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Share of revenue kept by the tenant, between 0 and 1
    #[serde(default)]
    pub commission_rate: f64,
    pub daily_rate: f64,
    #[serde(default)]
    pub mileage: Option<i32>,
}

impl CreateItemDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        validate_rates(Some(self.commission_rate), Some(self.daily_rate))?;
        validate_mileage(self.mileage)
    }
}

/// Data transfer object for updating an item
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateItemDto {
    pub name: Option<String>,
    pub registration: Option<String>,
    pub owner_name: Option<String>,
    pub commission_rate: Option<f64>,
    pub daily_rate: Option<f64>,
    pub mileage: Option<i32>,
    pub status: Option<ItemStatus>,
}

impl UpdateItemDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        validate_rates(self.commission_rate, self.daily_rate)?;
        validate_mileage(self.mileage)
    }
}

fn validate_rates(commission_rate: Option<f64>, daily_rate: Option<f64>) -> Result<(), String> {
    if let Some(rate) = commission_rate {
        if !(0.0..=1.0).contains(&rate) {
            return Err("commission_rate must be between 0 and 1".to_string());
        }
    }
    if let Some(rate) = daily_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err("daily_rate must not be negative".to_string());
        }
    }
    Ok(())
}

fn validate_mileage(mileage: Option<i32>) -> Result<(), String> {
    match mileage {
        Some(m) if m < 0 => Err("mileage must not be negative".to_string()),
        _ => Ok(()),
    }
}

/// Query parameters for filtering items
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ItemQueryDto {
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
}

/// A half-open date range given as query parameters
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct DateRangeQueryDto {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Response of an availability check
#[derive(Serialize, Deserialize, Debug)]
pub struct AvailabilityDto {
    pub available: bool,
    /// Blocking bookings that occupy part of the requested range
    pub conflicts: Vec<Booking>,
}

/// Data transfer object for recording maintenance on an item
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateMaintenanceDto {
    pub description: String,
    #[serde(default)]
    pub cost: f64,
    pub performed_on: NaiveDate,
    #[serde(default)]
    pub next_due_on: Option<NaiveDate>,
    #[serde(default)]
    pub mileage: Option<i32>,
}

impl CreateMaintenanceDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err("cost must not be negative".to_string());
        }
        if self.next_due_on.is_some_and(|due| due < self.performed_on) {
            return Err("next_due_on must not be before performed_on".to_string());
        }
        validate_mileage(self.mileage)
    }
}

/// Query parameters for upcoming maintenance
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct MaintenanceDueQueryDto {
    /// Look-ahead window in days (default 30)
    pub within_days: Option<i64>,
}

/// Data transfer object for creating a new booking
///
/// When `total_price` is omitted it is computed as nights × the item's
/// daily rate.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateBookingDto {
    pub item_id: String,
    pub customer_id: String,
    /// First occupied day
    pub start_date: NaiveDate,
    /// Hand-back day, strictly after `start_date`
    pub end_date: NaiveDate,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateBookingDto {
    pub fn validate(&self) -> Result<(), String> {
        validate_booking_dates(self.start_date, self.end_date)?;
        validate_price(self.total_price)
    }
}

/// Data transfer object for editing a booking
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct UpdateBookingDto {
    pub item_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_price: Option<f64>,
    pub notes: Option<String>,
}

impl UpdateBookingDto {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            validate_booking_dates(start, end)?;
        }
        validate_price(self.total_price)
    }
}

/// Checks that a booking covers at least one night
pub fn validate_booking_dates(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if end <= start {
        return Err("end_date must be after start_date".to_string());
    }
    Ok(())
}

fn validate_price(price: Option<f64>) -> Result<(), String> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err("total_price must not be negative".to_string()),
        _ => Ok(()),
    }
}

/// Data transfer object for moving a booking through its lifecycle
#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateBookingStatusDto {
    pub status: BookingStatus,
}

/// Query parameters for listing bookings
///
/// `status` may be repeated to match any of several statuses. `from`/`to`
/// select bookings that occupy any day of `[from, to)`.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct BookingQueryDto {
    pub status: Vec<BookingStatus>,
    pub item_id: Option<String>,
    pub customer_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Data transfer object for logging an expense
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateExpenseDto {
    #[serde(default)]
    pub item_id: Option<String>,
    pub category: ExpenseCategory,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub incurred_on: NaiveDate,
}

impl CreateExpenseDto {
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("amount must be positive".to_string());
        }
        Ok(())
    }
}

/// Query parameters for listing expenses
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ExpenseQueryDto {
    pub item_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Query parameters for listing invoices
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct InvoiceQueryDto {
    pub status: Option<InvoiceStatus>,
}

/// Data transfer object for signing a contract
#[derive(Serialize, Deserialize, Debug)]
pub struct SignContractDto {
    pub signer_name: String,
    /// Typed name or a drawn signature encoded as a data URL
    pub signature: String,
}

impl SignContractDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.signer_name.trim().is_empty() {
            return Err("signer_name must not be empty".to_string());
        }
        if self.signature.trim().is_empty() {
            return Err("signature must not be empty".to_string());
        }
        Ok(())
    }
}

/// One photo attached to a new inspection
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InspectionPhotoDto {
    pub position: String,
    pub url: String,
    #[serde(default)]
    pub damage_noted: bool,
}

/// Data transfer object for recording an inspection
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateInspectionDto {
    pub kind: InspectionKind,
    #[serde(default)]
    pub mileage: Option<i32>,
    /// Fuel or charge level in percent
    #[serde(default)]
    pub fuel_level: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<InspectionPhotoDto>,
}

impl CreateInspectionDto {
    pub fn validate(&self) -> Result<(), String> {
        validate_mileage(self.mileage)?;
        if self.fuel_level.is_some_and(|f| !(0..=100).contains(&f)) {
            return Err("fuel_level must be between 0 and 100".to_string());
        }
        for photo in &self.photos {
            if photo.position.trim().is_empty() || photo.url.trim().is_empty() {
                return Err("every photo needs a position and a url".to_string());
            }
        }
        Ok(())
    }
}

/// Reporting period, selecting bookings that start in `[from, to)`
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ReportQueryDto {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportQueryDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.to <= self.from {
            return Err("to must be after from".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
