use super::*;
use crate::dto::{CreateExpenseDto, CreateItemDto};
use crate::models::{ExpenseCategory, ItemKind};
use crate::repo::tests::{date, seed_booking, seed_customer, seed_tenant, setup_test_db};
use crate::repo::{create_expense, create_item, update_booking_status};

async fn owned_item(pool: &DbPool, tenant_id: &str, name: &str, owner: Option<&str>, rate: f64) -> Item {
    create_item(
        pool,
        tenant_id,
        CreateItemDto {
            kind: ItemKind::Property,
            name: name.to_string(),
            registration: None,
            owner_name: owner.map(str::to_string),
            commission_rate: rate,
            daily_rate: 100.0,
            mileage: None,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_commission_report_counts_revenue_statuses_only() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let tid = tenant.get_id();
    let flat = owned_item(&pool, &tid, "Seaview 3", Some("J. Smith"), 0.2).await;
    let customer = seed_customer(&pool, &tid, "Ada").await;

    // 4 nights at 100 = 400, confirmed
    let confirmed = seed_booking(&pool, &tid, &flat, &customer, "2026-07-01", "2026-07-05").await;
    update_booking_status(&pool, &tid, &confirmed.get_id(), BookingStatus::Confirmed).await.unwrap();
    // Still pending: not revenue
    seed_booking(&pool, &tid, &flat, &customer, "2026-07-10", "2026-07-12").await;
    // Starts in August: outside the period
    let august = seed_booking(&pool, &tid, &flat, &customer, "2026-08-01", "2026-08-03").await;
    update_booking_status(&pool, &tid, &august.get_id(), BookingStatus::Confirmed).await.unwrap();

    create_expense(
        &pool,
        &tid,
        CreateExpenseDto {
            item_id: Some(flat.get_id()),
            category: ExpenseCategory::Cleaning,
            amount: 30.0,
            description: "Turnover clean".to_string(),
            incurred_on: date("2026-07-05"),
        },
    )
    .await
    .unwrap();

    let lines = commission_report(&pool, &tid, date("2026-07-01"), date("2026-08-01")).unwrap();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.month, "2026-07");
    assert_eq!(line.bookings, 1);
    assert_eq!(line.revenue, 400.0);
    assert_eq!(line.commission, 80.0);
    assert_eq!(line.expenses, 30.0);
    assert_eq!(line.owner_payout, 290.0);
}

#[tokio::test]
async fn test_owner_report_and_summary() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let tid = tenant.get_id();
    let smith = owned_item(&pool, &tid, "Seaview 3", Some("J. Smith"), 0.25).await;
    let own = owned_item(&pool, &tid, "Office", None, 0.0).await;
    let customer = seed_customer(&pool, &tid, "Ada").await;

    for (item, start, end) in [(&smith, "2026-07-01", "2026-07-03"), (&own, "2026-07-02", "2026-07-03")] {
        let booking = seed_booking(&pool, &tid, item, &customer, start, end).await;
        update_booking_status(&pool, &tid, &booking.get_id(), BookingStatus::Confirmed).await.unwrap();
    }
    // Overhead not tied to an item only shows in the summary
    create_expense(
        &pool,
        &tid,
        CreateExpenseDto {
            item_id: None,
            category: ExpenseCategory::Insurance,
            amount: 50.0,
            description: "Liability".to_string(),
            incurred_on: date("2026-07-15"),
        },
    )
    .await
    .unwrap();

    let owners = owner_report(&pool, &tid, date("2026-07-01"), date("2026-08-01")).unwrap();
    assert_eq!(owners.len(), 2);
    assert_eq!(owners[0].owner_name, None);
    assert_eq!(owners[0].revenue, 100.0);
    assert_eq!(owners[1].owner_name.as_deref(), Some("J. Smith"));
    assert_eq!(owners[1].commission, 50.0);

    let summary = summary_report(&pool, &tid, date("2026-07-01"), date("2026-08-01")).unwrap();
    assert_eq!(summary.bookings, 2);
    assert_eq!(summary.revenue, 300.0);
    assert_eq!(summary.commission, 50.0);
    assert_eq!(summary.expenses, 50.0);
    assert_eq!(summary.net, 250.0);
}

#[tokio::test]
async fn test_reports_are_tenant_scoped() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let other = seed_tenant(&pool, "lakeside").await;
    let flat = owned_item(&pool, &tenant.get_id(), "Seaview 3", Some("J. Smith"), 0.2).await;
    let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;
    let booking = seed_booking(&pool, &tenant.get_id(), &flat, &customer, "2026-07-01", "2026-07-05").await;
    update_booking_status(&pool, &tenant.get_id(), &booking.get_id(), BookingStatus::Confirmed).await.unwrap();

    assert!(commission_report(&pool, &other.get_id(), date("2026-07-01"), date("2026-08-01")).unwrap().is_empty());
}
