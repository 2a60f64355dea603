#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, NewFinancial, PageRequest};
use migration::MigratorTrait;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (id, username) in [(ALICE, "alice"), (BOB, "bob")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (id, username, password) VALUES (?, ?, ?)",
            vec![id.into(), username.into(), "not-a-hash".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Two accounts, an expense category with one subcategory and an income
/// category, all owned by `user_id`.
pub struct Fixture {
    pub checking: i64,
    pub savings: i64,
    pub food: i64,
    pub groceries: i64,
    pub salary: i64,
}

pub async fn seed(engine: &Engine, user_id: i64) -> Fixture {
    let checking = engine.new_account(user_id, Some("Checking")).await.unwrap();
    let savings = engine.new_account(user_id, Some("Savings")).await.unwrap();
    let food = engine.new_category(user_id, Some("Food")).await.unwrap();
    let groceries = engine
        .new_subcategory(user_id, Some(food.id), Some("Groceries"))
        .await
        .unwrap();
    let salary = engine.new_category(user_id, Some("Salary")).await.unwrap();
    Fixture {
        checking: checking.id,
        savings: savings.id,
        food: food.id,
        groceries: groceries.id,
        salary: salary.id,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn entry(
    kind: &str,
    account_id: i64,
    category_id: i64,
    amount: i64,
    on: NaiveDate,
) -> NewFinancial {
    NewFinancial {
        name: Some(format!("{kind} {amount}")),
        amount: Some(amount),
        account_id: Some(account_id),
        account_to_id: None,
        category_id: Some(category_id),
        subcategory_id: None,
        transaction_date: Some(on),
        kind: Some(kind.to_string()),
    }
}

pub fn transfer(from: i64, to: i64, category_id: i64, amount: i64, on: NaiveDate) -> NewFinancial {
    NewFinancial {
        account_to_id: Some(to),
        ..entry("transfer", from, category_id, amount, on)
    }
}

pub fn page(page: u64, limit: u64) -> PageRequest {
    PageRequest { page, limit }
}
