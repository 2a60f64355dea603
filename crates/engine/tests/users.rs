mod common;

use engine::EngineError;

use common::engine_with_db;

#[tokio::test]
async fn created_user_can_authenticate() {
    let (engine, _db) = engine_with_db().await;

    let user = engine.new_user("carol", "s3cret").await.unwrap();
    assert_eq!(user.username, "carol");

    let found = engine.authenticate("carol", "s3cret").await.unwrap();
    assert_eq!(found, user);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_unauthorized() {
    let (engine, _db) = engine_with_db().await;
    engine.new_user("carol", "s3cret").await.unwrap();

    assert_eq!(
        engine.authenticate("carol", "S3CRET").await,
        Err(EngineError::Unauthorized)
    );
    assert_eq!(
        engine.authenticate("mallory", "s3cret").await,
        Err(EngineError::Unauthorized)
    );
}

#[tokio::test]
async fn usernames_are_unique() {
    let (engine, _db) = engine_with_db().await;
    engine.new_user("carol", "one").await.unwrap();

    assert_eq!(
        engine.new_user(" carol ", "two").await,
        Err(EngineError::ExistingKey("carol".to_string()))
    );
}

#[tokio::test]
async fn empty_password_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.new_user("dave", "").await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn concurrent_registrations_leave_one_user() {
    let (engine, _db) = engine_with_db().await;

    let (first, second) = tokio::join!(
        engine.new_user("erin", "one"),
        engine.new_user("erin", "two")
    );
    let mut outcomes = [first, second];
    outcomes.sort_by_key(|res| res.is_err());
    assert!(outcomes[0].is_ok());
    assert_eq!(
        outcomes[1],
        Err(EngineError::ExistingKey("erin".to_string()))
    );
}
