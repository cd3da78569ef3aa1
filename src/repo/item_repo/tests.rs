use super::*;
use crate::repo::tests::{seed_booking, seed_customer, seed_item, seed_tenant, setup_test_db};

fn golf() -> CreateItemDto {
    CreateItemDto {
        kind: ItemKind::Vehicle,
        name: "VW Golf".to_string(),
        registration: Some("HH-RD-42".to_string()),
        owner_name: Some("J. Smith".to_string()),
        commission_rate: 0.2,
        daily_rate: 45.0,
        mileage: Some(12000),
    }
}

#[tokio::test]
async fn test_create_item() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    let item = create_item(&pool, &tenant.get_id(), golf()).await.unwrap();

    assert_eq!(item.get_name(), "VW Golf");
    assert_eq!(item.get_tenant_id(), tenant.get_id());
    assert_eq!(item.get_owner_name().as_deref(), Some("J. Smith"));
    assert_eq!(item.get_status(), ItemStatus::Available);

    let fetched = get_item(&pool, &tenant.get_id(), &item.get_id()).unwrap().unwrap();
    assert_eq!(fetched, item);
}

#[tokio::test]
async fn test_get_item_of_other_tenant() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let other = seed_tenant(&pool, "lakeside").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

    assert!(get_item(&pool, &other.get_id(), &item.get_id()).unwrap().is_none());
}

#[tokio::test]
async fn test_list_items_filters() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    seed_item(&pool, &tenant.get_id(), "Golf").await;
    let boat = create_item(
        &pool,
        &tenant.get_id(),
        CreateItemDto { kind: ItemKind::Boat, name: "Sea Breeze".to_string(), ..golf() },
    )
    .await
    .unwrap();
    update_item(
        &pool,
        &tenant.get_id(),
        &boat.get_id(),
        UpdateItemDto { status: Some(ItemStatus::Maintenance), ..Default::default() },
    )
    .await
    .unwrap();

    assert_eq!(list_items(&pool, &tenant.get_id(), None, None).unwrap().len(), 2);

    let boats = list_items(&pool, &tenant.get_id(), Some(ItemKind::Boat), None).unwrap();
    assert_eq!(boats.len(), 1);
    assert_eq!(boats[0].get_id(), boat.get_id());

    let available = list_items(&pool, &tenant.get_id(), None, Some(ItemStatus::Available)).unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].get_name(), "Golf");
}

#[tokio::test]
async fn test_update_item() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = create_item(&pool, &tenant.get_id(), golf()).await.unwrap();

    let updated = update_item(
        &pool,
        &tenant.get_id(),
        &item.get_id(),
        UpdateItemDto { daily_rate: Some(50.0), ..Default::default() },
    )
    .await
    .unwrap();

    assert_eq!(updated.get_daily_rate(), 50.0);
    assert_eq!(updated.get_name(), "VW Golf");
    assert_eq!(updated.get_commission_rate(), 0.2);
}

#[tokio::test]
async fn test_update_missing_item() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    let err = update_item(&pool, &tenant.get_id(), "nope", UpdateItemDto::default()).await.unwrap_err();
    assert_eq!(err.downcast_ref::<DomainError>(), Some(&DomainError::NotFound("Item")));
}

#[tokio::test]
async fn test_delete_item() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;

    delete_item(&pool, &tenant.get_id(), &item.get_id()).await.unwrap();
    assert!(get_item(&pool, &tenant.get_id(), &item.get_id()).unwrap().is_none());
}

#[tokio::test]
async fn test_delete_booked_item_is_conflict() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;
    let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;
    seed_booking(&pool, &tenant.get_id(), &item, &customer, "2026-07-01", "2026-07-03").await;

    let err = delete_item(&pool, &tenant.get_id(), &item.get_id()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))));
    assert_eq!(list_item_bookings(&pool, &tenant.get_id(), &item.get_id()).unwrap().len(), 1);
}

#[tokio::test]
async fn test_advance_mileage_only_moves_forward() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = create_item(&pool, &tenant.get_id(), golf()).await.unwrap();

    let mut conn = pool.get().unwrap();
    assert_eq!(advance_mileage(&mut conn, &item.get_id(), 11000).unwrap(), 0);
    assert_eq!(advance_mileage(&mut conn, &item.get_id(), 12500).unwrap(), 1);
    drop(conn);

    let fetched = get_item(&pool, &tenant.get_id(), &item.get_id()).unwrap().unwrap();
    assert_eq!(fetched.get_mileage(), Some(12500));
}
