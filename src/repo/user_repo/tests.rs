use super::*;
use crate::repo::tests::{seed_tenant, setup_test_db};

#[tokio::test]
async fn test_create_and_list_users() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;

    let user = create_user(&pool, &tenant.get_id(), "ann@harbour.test".to_string(), "Ann".to_string(), UserRole::Owner)
        .await
        .unwrap();

    let users = list_users(&pool, &tenant.get_id()).unwrap();
    assert_eq!(users, vec![user.clone()]);
    assert_eq!(get_user(&pool, &tenant.get_id(), &user.get_id()).unwrap(), Some(user));
}

#[tokio::test]
async fn test_duplicate_email_within_tenant() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let other = seed_tenant(&pool, "lakeside").await;

    create_user(&pool, &tenant.get_id(), "ann@x.test".to_string(), "Ann".to_string(), UserRole::Staff).await.unwrap();
    let err = create_user(&pool, &tenant.get_id(), "ann@x.test".to_string(), "Ann 2".to_string(), UserRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))));

    // The same address is fine in another tenant
    assert!(create_user(&pool, &other.get_id(), "ann@x.test".to_string(), "Ann".to_string(), UserRole::Staff).await.is_ok());
}

#[tokio::test]
async fn test_delete_user_scoped_to_tenant() {
    let pool = setup_test_db();
    let tenant = seed_tenant(&pool, "harbour").await;
    let other = seed_tenant(&pool, "lakeside").await;

    let user = create_user(&pool, &tenant.get_id(), "bo@x.test".to_string(), "Bo".to_string(), UserRole::Manager)
        .await
        .unwrap();

    let err = delete_user(&pool, &other.get_id(), &user.get_id()).await.unwrap_err();
    assert_eq!(err.downcast_ref::<DomainError>(), Some(&DomainError::NotFound("User")));

    delete_user(&pool, &tenant.get_id(), &user.get_id()).await.unwrap();
    assert!(get_user(&pool, &tenant.get_id(), &user.get_id()).unwrap().is_none());
}
