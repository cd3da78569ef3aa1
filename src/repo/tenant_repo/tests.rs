use super::*;
use crate::repo::tests::setup_test_db;

#[tokio::test]
async fn test_create_and_get_tenant() {
    let pool = setup_test_db();

    let tenant = create_tenant(&pool, "Harbour Rentals".to_string(), "harbour".to_string()).await.unwrap();
    let fetched = get_tenant(&pool, &tenant.get_id()).unwrap().unwrap();

    assert_eq!(fetched, tenant);
}

#[tokio::test]
async fn test_duplicate_slug_is_conflict() {
    let pool = setup_test_db();

    create_tenant(&pool, "Harbour Rentals".to_string(), "harbour".to_string()).await.unwrap();
    let err = create_tenant(&pool, "Other".to_string(), "harbour".to_string()).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_list_tenants() {
    let pool = setup_test_db();

    create_tenant(&pool, "A".to_string(), "aa".to_string()).await.unwrap();
    create_tenant(&pool, "B".to_string(), "bb".to_string()).await.unwrap();

    let tenants = list_tenants(&pool).unwrap();
    assert_eq!(tenants.len(), 2);
}

#[tokio::test]
async fn test_get_missing_tenant() {
    let pool = setup_test_db();
    assert!(get_tenant(&pool, "nope").unwrap().is_none());
}
