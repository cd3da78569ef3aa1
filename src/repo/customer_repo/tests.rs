use super::*;
use crate::repo::tests::{seed_booking, seed_customer, seed_item, seed_tenant, setup_test_db};

#[tokio::test]
async fn test_create_and_get_customer() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    let dto = CreateCustomerDto {
        name: "Ada Lovelace".to_string(),
        email: Some("ada@example.com".to_string()),
        ..Default::default()
    };
    let customer = create_customer(&pool, &tenant.get_id(), dto).await.unwrap();

    let fetched = get_customer(&pool, &tenant.get_id(), &customer.get_id()).unwrap().unwrap();
    assert_eq!(fetched, customer);
}

#[tokio::test]
async fn test_customer_invisible_to_other_tenant() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let other = seed_tenant(&pool, "lakeside").await;
    let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;

    assert!(get_customer(&pool, &other.get_id(), &customer.get_id()).unwrap().is_none());
    assert!(list_customers(&pool, &other.get_id(), None).unwrap().is_empty());
}

#[tokio::test]
async fn test_search_customers() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    seed_customer(&pool, &tenant.get_id(), "Ada Lovelace").await;
    seed_customer(&pool, &tenant.get_id(), "Grace Hopper").await;
    create_customer(
        &pool,
        &tenant.get_id(),
        CreateCustomerDto {
            name: "Charles".to_string(),
            email: Some("babbage@ENGINE.test".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let found = list_customers(&pool, &tenant.get_id(), Some("lovelace")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_name(), "Ada Lovelace");

    let by_email = list_customers(&pool, &tenant.get_id(), Some("engine")).unwrap();
    assert_eq!(by_email.len(), 1);

    let all = list_customers(&pool, &tenant.get_id(), Some("  ")).unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_search_is_literal_and_unicode_aware() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    seed_customer(&pool, &tenant.get_id(), "Ada Lovelace").await;
    seed_customer(&pool, &tenant.get_id(), "Émile Zola").await;

    // Pattern characters match only themselves
    assert!(list_customers(&pool, &tenant.get_id(), Some("%")).unwrap().is_empty());
    assert!(list_customers(&pool, &tenant.get_id(), Some("A_a")).unwrap().is_empty());

    let found = list_customers(&pool, &tenant.get_id(), Some("émile")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_name(), "Émile Zola");
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let customer = create_customer(
        &pool,
        &tenant.get_id(),
        CreateCustomerDto {
            name: "Ada".to_string(),
            phone: Some("555-0100".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let update = UpdateCustomerDto { email: Some("ada@example.com".to_string()), ..Default::default() };
    let updated = update_customer(&pool, &tenant.get_id(), &customer.get_id(), update).await.unwrap();

    assert_eq!(updated.get_name(), "Ada");
    assert_eq!(updated.get_phone().as_deref(), Some("555-0100"));
    assert_eq!(updated.get_email().as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn test_delete_customer_with_bookings_is_conflict() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let item = seed_item(&pool, &tenant.get_id(), "Golf").await;
    let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;
    seed_booking(&pool, &tenant.get_id(), &item, &customer, "2026-07-01", "2026-07-05").await;

    let err = delete_customer(&pool, &tenant.get_id(), &customer.get_id()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))));

    let bookings = list_customer_bookings(&pool, &tenant.get_id(), &customer.get_id()).unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_delete_customer() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;

    delete_customer(&pool, &tenant.get_id(), &customer.get_id()).await.unwrap();
    assert!(get_customer(&pool, &tenant.get_id(), &customer.get_id()).unwrap().is_none());
}
