use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_tenant_slug_validation() {
    let ok = CreateTenantDto { name: "Harbour".to_string(), slug: "harbour".to_string() };
    assert!(ok.validate().is_ok());

    let bad = CreateTenantDto { name: "Harbour".to_string(), slug: "Harbour Rentals".to_string() };
    assert!(bad.validate().is_err());

    let blank = CreateTenantDto { name: "  ".to_string(), slug: "harbour".to_string() };
    assert_eq!(blank.validate().unwrap_err(), "name must not be empty");
}

#[test]
fn test_booking_dates_must_cover_a_night() {
    let dto = CreateBookingDto {
        item_id: "i".to_string(),
        customer_id: "c".to_string(),
        start_date: date("2026-07-05"),
        end_date: date("2026-07-05"),
        total_price: None,
        notes: None,
    };
    assert_eq!(dto.validate().unwrap_err(), "end_date must be after start_date");

    let reversed = CreateBookingDto { end_date: date("2026-07-01"), ..dto.clone() };
    assert!(reversed.validate().is_err());

    let ok = CreateBookingDto { end_date: date("2026-07-06"), ..dto };
    assert!(ok.validate().is_ok());
}

#[test]
fn test_negative_price_rejected() {
    let dto = CreateBookingDto {
        item_id: "i".to_string(),
        customer_id: "c".to_string(),
        start_date: date("2026-07-01"),
        end_date: date("2026-07-05"),
        total_price: Some(-1.0),
        notes: None,
    };
    assert!(dto.validate().is_err());
}

#[test]
fn test_update_booking_with_one_date_defers_check() {
    // Only one side given: the handler checks it against the stored booking
    let dto = UpdateBookingDto { start_date: Some(date("2026-07-05")), ..Default::default() };
    assert!(dto.validate().is_ok());
}

#[test]
fn test_item_rates() {
    let json = r#"{"kind":"vehicle","name":"Golf","daily_rate":40.0,"commission_rate":1.5}"#;
    let dto: CreateItemDto = serde_json::from_str(json).unwrap();
    assert_eq!(dto.validate().unwrap_err(), "commission_rate must be between 0 and 1");

    let json = r#"{"kind":"boat","name":"Sea Breeze","daily_rate":300.0}"#;
    let dto: CreateItemDto = serde_json::from_str(json).unwrap();
    assert_eq!(dto.commission_rate, 0.0);
    assert!(dto.validate().is_ok());

    let update = UpdateItemDto { daily_rate: Some(-5.0), ..Default::default() };
    assert!(update.validate().is_err());
}

#[test]
fn test_customer_email_checked_when_present() {
    let dto = CreateCustomerDto { name: "Ada".to_string(), email: Some("nope".to_string()), ..Default::default() };
    assert!(dto.validate().is_err());

    let dto = CreateCustomerDto { name: "Ada".to_string(), ..Default::default() };
    assert!(dto.validate().is_ok());
}

#[test]
fn test_inspection_validation() {
    let dto = CreateInspectionDto {
        kind: InspectionKind::Pickup,
        mileage: Some(100),
        fuel_level: Some(120),
        notes: None,
        photos: vec![],
    };
    assert_eq!(dto.validate().unwrap_err(), "fuel_level must be between 0 and 100");

    let dto = CreateInspectionDto {
        fuel_level: Some(80),
        photos: vec![InspectionPhotoDto { position: "front".to_string(), url: " ".to_string(), damage_noted: false }],
        ..dto
    };
    assert!(dto.validate().is_err());
}

#[test]
fn test_maintenance_due_date_not_before_service() {
    let dto = CreateMaintenanceDto {
        description: "Oil change".to_string(),
        cost: 80.0,
        performed_on: date("2026-05-01"),
        next_due_on: Some(date("2026-04-01")),
        mileage: None,
    };
    assert!(dto.validate().is_err());
}

#[test]
fn test_booking_query_parses_repeated_status() {
    let query: BookingQueryDto =
        serde_html_form::from_str("status=pending&status=confirmed&item_id=abc&from=2026-07-01").unwrap();

    assert_eq!(query.status, vec![BookingStatus::Pending, BookingStatus::Confirmed]);
    assert_eq!(query.item_id.as_deref(), Some("abc"));
    assert_eq!(query.from, Some(date("2026-07-01")));
    assert_eq!(query.to, None);
}

#[test]
fn test_empty_booking_query() {
    let query: BookingQueryDto = serde_html_form::from_str("").unwrap();
    assert!(query.status.is_empty());
    assert!(query.item_id.is_none());
}

#[test]
fn test_report_period_validation() {
    let ok = ReportQueryDto { from: date("2026-01-01"), to: date("2026-02-01") };
    assert!(ok.validate().is_ok());
    let bad = ReportQueryDto { from: date("2026-02-01"), to: date("2026-02-01") };
    assert!(bad.validate().is_err());
}
