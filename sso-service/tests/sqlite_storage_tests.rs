mod common;

use auth::Claims;
use auth::JwtHandler;
use common::sqlite_service;
use common::sqlite_storage;
use common::TEST_APP_ID;
use common::TEST_APP_SECRET;
use sso_service::domain::auth::errors::AuthErrorKind;
use sso_service::domain::auth::errors::StorageError;
use sso_service::domain::auth::models::AppId;
use sso_service::domain::auth::models::UserId;
use sso_service::domain::auth::ports::AppProvider;
use sso_service::domain::auth::ports::AuthServicePort;
use sso_service::domain::auth::ports::UserProvider;
use sso_service::domain::auth::ports::UserSaver;

#[tokio::test]
async fn test_save_user_assigns_sequential_ids() {
    let storage = sqlite_storage().await;

    let first = storage.save_user("a@x.com", b"hash-a").await.unwrap();
    let second = storage.save_user("b@x.com", b"hash-b").await.unwrap();

    assert_eq!(first, UserId(1));
    assert_eq!(second, UserId(2));
}

#[tokio::test]
async fn test_save_user_duplicate_email() {
    let storage = sqlite_storage().await;
    storage.save_user("a@x.com", b"hash-a").await.unwrap();

    let result = storage.save_user("a@x.com", b"hash-b").await;

    assert_eq!(
        result.unwrap_err(),
        StorageError::DuplicateEmail("a@x.com".to_string())
    );

    // The stored hash is untouched
    let user = storage.user("a@x.com").await.unwrap();
    assert_eq!(user.password_hash, b"hash-a".to_vec());
}

#[tokio::test]
async fn test_user_lookup() {
    let storage = sqlite_storage().await;
    let id = storage.save_user("a@x.com", b"hash-a").await.unwrap();

    let user = storage.user("a@x.com").await.unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.email, "a@x.com");
    assert!(!user.is_admin);
}

#[tokio::test]
async fn test_user_lookup_is_case_sensitive() {
    let storage = sqlite_storage().await;
    storage.save_user("a@x.com", b"hash-a").await.unwrap();

    let result = storage.user("A@X.COM").await;

    assert!(matches!(result, Err(StorageError::UserNotFound(_))));
}

#[tokio::test]
async fn test_is_admin_and_set_admin() {
    let storage = sqlite_storage().await;
    let id = storage.save_user("a@x.com", b"hash-a").await.unwrap();

    assert!(!storage.is_admin(id).await.unwrap());

    storage.set_admin(id, true).await.unwrap();
    assert!(storage.is_admin(id).await.unwrap());

    storage.set_admin(id, false).await.unwrap();
    assert!(!storage.is_admin(id).await.unwrap());
}

#[tokio::test]
async fn test_is_admin_unknown_user() {
    let storage = sqlite_storage().await;

    let result = storage.is_admin(UserId(42)).await;

    assert_eq!(result.unwrap_err(), StorageError::user_not_found(UserId(42)));
}

#[tokio::test]
async fn test_set_admin_unknown_user() {
    let storage = sqlite_storage().await;

    let result = storage.set_admin(UserId(42), true).await;

    assert_eq!(result.unwrap_err(), StorageError::user_not_found(UserId(42)));
}

#[tokio::test]
async fn test_app_lookup() {
    let storage = sqlite_storage().await;

    let app = storage.app(AppId(TEST_APP_ID)).await.unwrap();
    assert_eq!(app.name, "test");
    assert_eq!(app.secret, TEST_APP_SECRET);

    let missing = storage.app(AppId(2)).await;
    assert_eq!(missing.unwrap_err(), StorageError::AppNotFound(AppId(2)));
}

#[tokio::test]
async fn test_service_flow_over_sqlite() {
    let (storage, service) = sqlite_service().await;

    let user_id = service.register_new_user("a@x.com", "secret1").await.unwrap();
    assert_eq!(user_id, UserId(1));

    let err = service
        .register_new_user("a@x.com", "other")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::UserAlreadyExists);

    // Only the hash is persisted
    let stored = storage.user("a@x.com").await.unwrap();
    assert_ne!(stored.password_hash, b"secret1".to_vec());

    let token = service
        .login("a@x.com", "secret1", AppId(TEST_APP_ID))
        .await
        .unwrap();
    let claims: Claims = JwtHandler::new(TEST_APP_SECRET.as_bytes())
        .unwrap()
        .decode(&token)
        .unwrap();
    assert_eq!(claims.uid, user_id.0);
    assert_eq!(claims.app_id, TEST_APP_ID);

    let err = service
        .login("a@x.com", "wrong", AppId(TEST_APP_ID))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);

    assert!(!service.is_admin(user_id).await.unwrap());
    storage.set_admin(user_id, true).await.unwrap();
    assert!(service.is_admin(user_id).await.unwrap());
}
