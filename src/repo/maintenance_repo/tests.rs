use super::*;
use crate::repo::tests::{date, seed_item, seed_tenant, setup_test_db};
use crate::repo::get_item;

fn service(performed_on: &str, next_due_on: Option<&str>, mileage: Option<i32>) -> CreateMaintenanceDto {
    CreateMaintenanceDto {
        description: "Oil change".to_string(),
        cost: 89.5,
        performed_on: date(performed_on),
        next_due_on: next_due_on.map(date),
        mileage,
    }
}

#[tokio::test]
async fn test_create_maintenance_advances_mileage() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

    let record = create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-05-01", None, Some(15000)))
        .await
        .unwrap();
    assert_eq!(record.get_item_id(), item.get_id());

    let item = get_item(&pool, &tenant.get_id(), &item.get_id()).unwrap().unwrap();
    assert_eq!(item.get_mileage(), Some(15000));

    // An older reading does not roll the odometer back
    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-04-01", None, Some(9000)))
        .await
        .unwrap();
    let item = get_item(&pool, &tenant.get_id(), &item.get_id()).unwrap().unwrap();
    assert_eq!(item.get_mileage(), Some(15000));
}

#[tokio::test]
async fn test_maintenance_for_unknown_item() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    let err = create_maintenance(&pool, &tenant.get_id(), "nope", service("2026-05-01", None, None))
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<DomainError>(), Some(&DomainError::NotFound("Item")));
}

#[tokio::test]
async fn test_list_maintenance_newest_first() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-10", None, None)).await.unwrap();
    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-03-10", None, None)).await.unwrap();

    let records = list_maintenance(&pool, &tenant.get_id(), &item.get_id()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_performed_on(), date("2026-03-10"));
}

#[tokio::test]
async fn test_due_maintenance_window() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-01", Some("2026-06-20"), None))
        .await
        .unwrap();
    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-01", Some("2026-06-05"), None))
        .await
        .unwrap();
    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-01", Some("2026-09-01"), None))
        .await
        .unwrap();
    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-01", None, None))
        .await
        .unwrap();

    let due = list_due_maintenance(&pool, &tenant.get_id(), date("2026-06-01"), 30).unwrap();
    let dates: Vec<_> = due.iter().map(|r| r.get_next_due_on().unwrap()).collect();
    assert_eq!(dates, vec![date("2026-06-05"), date("2026-06-20")]);
}

#[tokio::test]
async fn test_due_maintenance_very_wide_window() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-01", Some("2026-02-01"), None))
        .await
        .unwrap();
    create_maintenance(&pool, &tenant.get_id(), &item.get_id(), service("2026-01-01", None, None))
        .await
        .unwrap();

    let today = date("2026-01-15");
    assert_eq!(list_due_maintenance(&pool, &tenant.get_id(), today, 30).unwrap().len(), 1);
    // Past year 9999 and past the end of the calendar
    assert_eq!(list_due_maintenance(&pool, &tenant.get_id(), today, 10_000_000).unwrap().len(), 1);
    assert_eq!(list_due_maintenance(&pool, &tenant.get_id(), today, u64::MAX).unwrap().len(), 1);
}
