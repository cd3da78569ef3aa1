//! HTML documents handed to customers
//!
//! Contracts and inspection reports are rendered with askama from records
//! already loaded by the caller. Values are formatted into strings here so
//! the templates stay free of logic; askama escapes everything it prints.

use askama::Template;
use chrono::{DateTime, NaiveDate, Utc};

use crate::comparison::InspectionComparison;
use crate::models::{Booking, Contract, Customer, InspectionWithPhotos, Item, Tenant};

/// Placeholder for values a record does not have
const MISSING: &str = "-";

/// Placeholder in an unsigned contract that the signature block replaces
pub const UNSIGNED_MARK: &str = r#"<p class="unsigned">Not signed yet.</p>"#;

#[derive(Template)]
#[template(path = "signature.html")]
pub struct SignatureBlock {
    pub signer_name: String,
    pub signature: String,
    pub signed_at: String,
}

#[derive(Template)]
#[template(path = "contract.html")]
pub struct ContractDocument {
    pub reference: String,
    pub tenant_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_license: String,
    pub item_kind: String,
    pub item_name: String,
    pub registration: String,
    pub start_date: String,
    pub end_date: String,
    pub nights: i64,
    pub total_price: String,
    pub daily_rate: String,
    pub notes: Option<String>,
    pub generated_on: String,
}

/// One position in the photo table of an inspection report
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub position: String,
    pub pickup_urls: Vec<String>,
    pub return_urls: Vec<String>,
    pub new_damage: bool,
}

#[derive(Template)]
#[template(path = "inspection_report.html")]
pub struct InspectionReportDocument {
    pub reference: String,
    pub tenant_name: String,
    pub item_name: String,
    pub customer_name: String,
    pub start_date: String,
    pub end_date: String,
    pub pickup_at: String,
    pub return_at: String,
    pub pickup_mileage: String,
    pub return_mileage: String,
    pub pickup_fuel: String,
    pub return_fuel: String,
    pub mileage_driven: String,
    pub fuel_delta: String,
    pub new_damage: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub generated_on: String,
}

/// Formats an amount with two decimals and the currency code
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{} {:.2}", currency, amount)
}

fn or_missing(value: Option<String>) -> String {
    value.unwrap_or_else(|| MISSING.to_string())
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Renders the unsigned rental agreement for a booking
pub fn render_contract(
    tenant: &Tenant,
    booking: &Booking,
    customer: &Customer,
    item: &Item,
    currency: &str,
) -> anyhow::Result<String> {
    let document = ContractDocument {
        reference: booking.get_id(),
        tenant_name: tenant.get_name(),
        customer_name: customer.get_name(),
        customer_email: or_missing(customer.get_email()),
        customer_phone: or_missing(customer.get_phone()),
        customer_license: or_missing(customer.get_license_number()),
        item_kind: item.get_kind().to_string(),
        item_name: item.get_name(),
        registration: or_missing(item.get_registration()),
        start_date: format_date(booking.get_start_date()),
        end_date: format_date(booking.get_end_date()),
        nights: booking.get_nights(),
        total_price: format_money(booking.get_total_price(), currency),
        daily_rate: format_money(item.get_daily_rate(), currency),
        notes: booking.get_notes(),
        generated_on: format_timestamp(Utc::now()),
    };

    Ok(document.render()?)
}

/// Fills the signature of `contract` into its stored document
///
/// Only the placeholder changes, so the signed document carries exactly the
/// terms the customer was shown.
pub fn apply_signature(body_html: &str, contract: &Contract) -> anyhow::Result<String> {
    if !body_html.contains(UNSIGNED_MARK) {
        anyhow::bail!("Contract {} has no signature placeholder", contract.get_id());
    }

    let block = SignatureBlock {
        signer_name: or_missing(contract.get_signer_name()),
        signature: or_missing(contract.get_signature()),
        signed_at: contract.get_signed_at().map(format_timestamp).unwrap_or_else(|| MISSING.to_string()),
    }
    .render()?;

    Ok(body_html.replacen(UNSIGNED_MARK, &block, 1))
}

/// Renders the pickup/return comparison of a booking
pub fn render_inspection_report(
    tenant: &Tenant,
    booking: &Booking,
    customer: &Customer,
    item: &Item,
    pickup: &InspectionWithPhotos,
    ret: &InspectionWithPhotos,
    comparison: &InspectionComparison,
) -> anyhow::Result<String> {
    let fuel = |level: Option<i32>| level.map(|l| format!("{}%", l)).unwrap_or_else(|| MISSING.to_string());
    let number = |n: Option<i32>| n.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string());

    let rows = comparison
        .pairs
        .iter()
        .map(|pair| ReportRow {
            position: pair.position.clone(),
            pickup_urls: pair.pickup.iter().map(|p| p.get_url()).collect(),
            return_urls: pair.return_photos.iter().map(|p| p.get_url()).collect(),
            new_damage: pair.new_damage,
        })
        .collect();

    let document = InspectionReportDocument {
        reference: booking.get_id(),
        tenant_name: tenant.get_name(),
        item_name: item.get_name(),
        customer_name: customer.get_name(),
        start_date: format_date(booking.get_start_date()),
        end_date: format_date(booking.get_end_date()),
        pickup_at: format_timestamp(pickup.inspection.get_created_at()),
        return_at: format_timestamp(ret.inspection.get_created_at()),
        pickup_mileage: number(pickup.inspection.get_mileage()),
        return_mileage: number(ret.inspection.get_mileage()),
        pickup_fuel: fuel(pickup.inspection.get_fuel_level()),
        return_fuel: fuel(ret.inspection.get_fuel_level()),
        mileage_driven: number(comparison.mileage_driven),
        fuel_delta: comparison
            .fuel_delta
            .map(|d| format!("{:+} points", d))
            .unwrap_or_else(|| MISSING.to_string()),
        new_damage: comparison.new_damage.clone(),
        rows,
        generated_on: format_timestamp(Utc::now()),
    };

    Ok(document.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare_inspections;
    use crate::models::{Inspection, InspectionKind, InspectionPhoto, ItemKind};

    fn fixtures() -> (Tenant, Booking, Customer, Item) {
        let tenant = Tenant::new("Harbour Rentals".to_string(), "harbour".to_string());
        let customer = Customer::new(
            tenant.get_id(),
            "Ada <script>".to_string(),
            Some("ada@example.com".to_string()),
            None,
            None,
            None,
        );
        let item = Item::new(tenant.get_id(), ItemKind::Vehicle, "VW Golf".to_string(), 45.0)
            .with_registration(Some("AB-123-C".to_string()));
        let booking = Booking::new(
            tenant.get_id(),
            item.get_id(),
            customer.get_id(),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 4).unwrap(),
            135.0,
            Some("Child seat".to_string()),
        );
        (tenant, booking, customer, item)
    }

    #[test]
    fn test_contract_contains_booking_details() {
        let (tenant, booking, customer, item) = fixtures();
        let html = render_contract(&tenant, &booking, &customer, &item, "EUR").unwrap();

        assert!(html.contains("Harbour Rentals"));
        assert!(html.contains("VW Golf"));
        assert!(html.contains("AB-123-C"));
        assert!(html.contains("2026-07-01"));
        assert!(html.contains("EUR 135.00"));
        assert!(html.contains("Child seat"));
        assert!(html.contains("Not signed yet."));
    }

    #[test]
    fn test_contract_escapes_customer_input() {
        let (tenant, booking, customer, item) = fixtures();
        let html = render_contract(&tenant, &booking, &customer, &item, "EUR").unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_apply_signature_keeps_terms() {
        let (tenant, booking, customer, item) = fixtures();
        let html = render_contract(&tenant, &booking, &customer, &item, "EUR").unwrap();
        let mut contract = Contract::new(tenant.get_id(), booking.get_id(), html.clone());
        contract.sign("Ada".to_string(), "<b>A.</b>".to_string());

        let signed = apply_signature(&html, &contract).unwrap();

        assert!(!signed.contains(UNSIGNED_MARK));
        assert!(signed.contains("Signed by <strong>Ada</strong>"));
        assert!(signed.contains("&lt;b&gt;A.&lt;/b&gt;"));

        // Everything around the placeholder is untouched
        let at = html.find(UNSIGNED_MARK).unwrap();
        assert_eq!(&signed[..at], &html[..at]);
        assert!(signed.ends_with(&html[at + UNSIGNED_MARK.len()..]));
    }

    #[test]
    fn test_apply_signature_needs_placeholder() {
        let (tenant, booking, _, _) = fixtures();
        let mut contract = Contract::new(tenant.get_id(), booking.get_id(), "<p>terms</p>".to_string());
        contract.sign("Ada".to_string(), "A".to_string());
        assert!(apply_signature("<p>terms</p>", &contract).is_err());
    }

    #[test]
    fn test_inspection_report_flags_new_damage() {
        let (tenant, booking, customer, item) = fixtures();
        let pickup_inspection = Inspection::new(tenant.get_id(), booking.get_id(), InspectionKind::Pickup, Some(100), Some(90), None);
        let return_inspection = Inspection::new(tenant.get_id(), booking.get_id(), InspectionKind::Return, Some(400), Some(50), None);
        let pickup = InspectionWithPhotos {
            photos: vec![InspectionPhoto::new(pickup_inspection.get_id(), "front".to_string(), "https://img/p-front.jpg".to_string(), false)],
            inspection: pickup_inspection,
        };
        let ret = InspectionWithPhotos {
            photos: vec![InspectionPhoto::new(return_inspection.get_id(), "front".to_string(), "https://img/r-front.jpg".to_string(), true)],
            inspection: return_inspection,
        };
        let comparison = compare_inspections(&pickup, &ret);

        let html = render_inspection_report(&tenant, &booking, &customer, &item, &pickup, &ret, &comparison).unwrap();

        assert!(html.contains("New damage at:"));
        // askama escapes slashes, so match on the file name only
        assert!(html.contains("r-front.jpg"));
        assert!(html.contains("300"));
        assert!(html.contains("-40 points"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.5, "EUR"), "EUR 12.50");
    }
}
