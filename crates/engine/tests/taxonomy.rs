mod common;

use engine::{EngineError, NewFinancial};

use common::{ALICE, BOB, date, engine_with_db, entry, page, seed};

#[tokio::test]
async fn names_are_trimmed_and_required() {
    let (engine, _db) = engine_with_db().await;

    let category = engine.new_category(ALICE, Some("  Travel ")).await.unwrap();
    assert_eq!(category.name, "Travel");
    assert_eq!(category.user_id, ALICE);

    assert_eq!(
        engine.new_category(ALICE, None).await,
        Err(EngineError::Validation(
            "category name must not be empty".to_string()
        ))
    );
    assert!(matches!(
        engine.new_account(ALICE, Some("")).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn subcategory_needs_an_owned_category() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    assert_eq!(
        engine.new_subcategory(ALICE, None, Some("Flights")).await,
        Err(EngineError::Validation("categoryId is required".to_string()))
    );
    assert_eq!(
        engine.new_subcategory(BOB, Some(fx.food), Some("Snacks")).await,
        Err(EngineError::NotFound(format!(
            "category {} not found",
            fx.food
        )))
    );

    let created = engine
        .new_subcategory(ALICE, Some(fx.food), Some("Restaurants"))
        .await
        .unwrap();
    assert_eq!(created.category_id, fx.food);
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;
    engine
        .new_financial(
            ALICE,
            entry("expense", fx.checking, fx.food, 80, date(2026, 1, 1)),
        )
        .await
        .unwrap();

    assert_eq!(
        engine.delete_category(ALICE, fx.food).await,
        Err(EngineError::ReferentialConflict(
            "Please remove all financials using this category before deleting it".to_string()
        ))
    );

    // Subcategories survive the failed delete.
    let subs = engine
        .list_subcategories(ALICE, Some(fx.food), page(0, 10), None)
        .await
        .unwrap();
    assert_eq!(subs.row_count, 1);
}

#[tokio::test]
async fn category_used_through_a_subcategory_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;
    engine
        .new_financial(
            ALICE,
            NewFinancial {
                subcategory_id: Some(fx.groceries),
                ..entry("expense", fx.checking, fx.food, 80, date(2026, 1, 1))
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_subcategory(ALICE, fx.groceries).await,
        Err(EngineError::ReferentialConflict(_))
    ));
    assert!(matches!(
        engine.delete_category(ALICE, fx.food).await,
        Err(EngineError::ReferentialConflict(_))
    ));
}

#[tokio::test]
async fn unused_category_is_deleted_with_its_subcategories() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    assert_eq!(engine.delete_category(ALICE, fx.food).await, Ok(1));

    let categories = engine
        .list_categories(ALICE, page(0, 10), None)
        .await
        .unwrap();
    let names: Vec<&str> = categories.rows.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Salary"]);

    let subs = engine
        .list_subcategories(ALICE, Some(fx.food), page(0, 10), None)
        .await
        .unwrap();
    assert_eq!(subs.row_count, 0);
}

#[tokio::test]
async fn deleting_unknown_rows_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    assert_eq!(
        engine.delete_category(ALICE, 9_999).await,
        Err(EngineError::NotFound("category 9999 not found".to_string()))
    );
    assert_eq!(
        engine.delete_subcategory(BOB, fx.groceries).await,
        Err(EngineError::NotFound(format!(
            "subcategory {} not found",
            fx.groceries
        )))
    );
    assert_eq!(engine.delete_subcategory(ALICE, fx.groceries).await, Ok(1));
}
