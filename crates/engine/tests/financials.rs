mod common;

use sea_orm::{ConnectionTrait, Statement};

use engine::{EngineError, FinancialKind, FinancialListFilter, NewFinancial};

use common::{ALICE, BOB, date, engine_with_db, entry, page, seed, transfer};

#[tokio::test]
async fn expense_is_recorded_as_a_single_row() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let rows = engine
        .new_financial(
            ALICE,
            NewFinancial {
                subcategory_id: Some(fx.groceries),
                ..entry("Expense", fx.checking, fx.food, 4_200, date(2026, 3, 2))
            },
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.kind, FinancialKind::Expense);
    assert_eq!(row.amount, 4_200);
    assert_eq!(row.account_id, fx.checking);
    assert_eq!(row.subcategory_id, Some(fx.groceries));
    assert_eq!(row.user_id, ALICE);
    assert!(!row.is_transfer);
}

#[tokio::test]
async fn transfer_writes_two_flagged_legs_that_net_to_zero() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let legs = engine
        .new_financial(
            ALICE,
            transfer(fx.checking, fx.savings, fx.food, 10_000, date(2026, 4, 1)),
        )
        .await
        .unwrap();

    assert_eq!(legs.len(), 2);
    let (outgoing, incoming) = (&legs[0], &legs[1]);
    assert_eq!(
        (outgoing.account_id, outgoing.kind, outgoing.amount),
        (fx.checking, FinancialKind::Expense, 10_000)
    );
    assert_eq!(
        (incoming.account_id, incoming.kind, incoming.amount),
        (fx.savings, FinancialKind::Income, 10_000)
    );
    assert!(outgoing.is_transfer && incoming.is_transfer);
    assert_eq!(outgoing.name, incoming.name);
    assert_eq!(outgoing.category_id, incoming.category_id);
    assert_eq!(outgoing.transaction_date, incoming.transaction_date);

    let accounts = engine.list_accounts(ALICE, page(0, 10), None).await.unwrap();
    let net: Vec<(i64, i64)> = accounts.rows.iter().map(|a| (a.id, a.net_total)).collect();
    assert_eq!(net, vec![(fx.checking, -10_000), (fx.savings, 10_000)]);
}

#[tokio::test]
async fn transfer_needs_a_distinct_destination() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let missing = engine
        .new_financial(
            ALICE,
            entry("transfer", fx.checking, fx.food, 100, date(2026, 1, 5)),
        )
        .await;
    assert_eq!(
        missing,
        Err(EngineError::Validation("id_account_to is required".to_string()))
    );

    let same = engine
        .new_financial(
            ALICE,
            transfer(fx.checking, fx.checking, fx.food, 100, date(2026, 1, 5)),
        )
        .await;
    assert!(matches!(same, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn transfer_rolls_back_first_leg_when_second_fails() {
    let (engine, db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE TRIGGER reject_income BEFORE INSERT ON financials \
         WHEN NEW.type = 'income' BEGIN SELECT RAISE(ABORT, 'income disabled'); END;",
    ))
    .await
    .unwrap();

    let res = engine
        .new_financial(
            ALICE,
            transfer(fx.checking, fx.savings, fx.food, 500, date(2026, 2, 1)),
        )
        .await;
    assert!(matches!(res, Err(EngineError::Database(_))));

    let listed = engine
        .list_financials(ALICE, page(0, 10), &FinancialListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.row_count, 0);
    assert!(listed.rows.is_empty());
}

#[tokio::test]
async fn missing_fields_are_reported_by_name() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let no_date = NewFinancial {
        transaction_date: None,
        ..entry("income", fx.checking, fx.salary, 1, date(2026, 1, 1))
    };
    assert_eq!(
        engine.new_financial(ALICE, no_date).await,
        Err(EngineError::Validation("transactionDate is required".to_string()))
    );

    let bad_kind = entry("refund", fx.checking, fx.salary, 1, date(2026, 1, 1));
    assert_eq!(
        engine.new_financial(ALICE, bad_kind).await,
        Err(EngineError::Validation(
            "invalid financial type: refund".to_string()
        ))
    );
}

#[tokio::test]
async fn amount_must_not_be_negative() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let negative = entry("expense", fx.checking, fx.food, -1, date(2026, 1, 1));
    assert!(matches!(
        engine.new_financial(ALICE, negative).await,
        Err(EngineError::Validation(_))
    ));

    let zero = entry("expense", fx.checking, fx.food, 0, date(2026, 1, 1));
    assert_eq!(engine.new_financial(ALICE, zero).await.unwrap().len(), 1);
}

#[tokio::test]
async fn references_must_belong_to_the_same_user() {
    let (engine, _db) = engine_with_db().await;
    let alice = seed(&engine, ALICE).await;
    let bob = seed(&engine, BOB).await;

    let foreign_account = entry("expense", bob.checking, alice.food, 10, date(2026, 1, 1));
    assert_eq!(
        engine.new_financial(ALICE, foreign_account).await,
        Err(EngineError::NotFound(format!(
            "account {} not found",
            bob.checking
        )))
    );

    let foreign_category = entry("expense", alice.checking, bob.food, 10, date(2026, 1, 1));
    assert!(matches!(
        engine.new_financial(ALICE, foreign_category).await,
        Err(EngineError::NotFound(_))
    ));

    let foreign_destination = transfer(alice.checking, bob.savings, alice.food, 10, date(2026, 1, 1));
    assert!(matches!(
        engine.new_financial(ALICE, foreign_destination).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn subcategory_must_belong_to_the_category() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let mismatched = NewFinancial {
        subcategory_id: Some(fx.groceries),
        ..entry("income", fx.checking, fx.salary, 10, date(2026, 1, 1))
    };
    assert!(matches!(
        engine.new_financial(ALICE, mismatched).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn deleting_one_transfer_leg_keeps_the_other() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;

    let legs = engine
        .new_financial(
            ALICE,
            transfer(fx.checking, fx.savings, fx.food, 750, date(2026, 5, 5)),
        )
        .await
        .unwrap();

    assert_eq!(engine.delete_financial(ALICE, legs[0].id).await, Ok(1));

    let listed = engine
        .list_financials(ALICE, page(0, 10), &FinancialListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.row_count, 1);
    assert_eq!(listed.rows[0].id, legs[1].id);
    assert!(listed.rows[0].is_transfer);
}

#[tokio::test]
async fn deletes_are_scoped_to_the_owner() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;
    let rows = engine
        .new_financial(
            ALICE,
            entry("income", fx.checking, fx.salary, 900, date(2026, 1, 31)),
        )
        .await
        .unwrap();

    assert_eq!(
        engine.delete_financial(BOB, rows[0].id).await,
        Err(EngineError::NotFound(format!(
            "financial {} not found",
            rows[0].id
        )))
    );
    assert!(matches!(
        engine.delete_account(BOB, fx.checking).await,
        Err(EngineError::NotFound(_))
    ));

    let listed = engine
        .list_financials(ALICE, page(0, 10), &FinancialListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.row_count, 1);
}

#[tokio::test]
async fn deleting_an_account_is_not_blocked_by_its_financials() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, ALICE).await;
    engine
        .new_financial(
            ALICE,
            entry("expense", fx.checking, fx.food, 300, date(2026, 1, 10)),
        )
        .await
        .unwrap();

    assert_eq!(engine.delete_account(ALICE, fx.checking).await, Ok(1));

    let listed = engine
        .list_financials(ALICE, page(0, 10), &FinancialListFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.row_count, 0);

    let dashboard = engine.dashboard(ALICE, date(2026, 6, 1)).await.unwrap();
    assert_eq!(dashboard.all_time.total_expense, 300);
}
