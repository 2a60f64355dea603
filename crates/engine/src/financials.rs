//! Ledger rows.
//!
//! A financial is a single income or expense against one account. A transfer
//! is not a row kind of its own: it is stored as an expense on the source
//! account plus an income on the destination, both flagged `is_transfer`.

use chrono::NaiveDate;
use sea_orm::{FromQueryResult, entity::prelude::*};
use serde::Serialize;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialKind {
    Income,
    Expense,
}

impl FinancialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Sign applied to `amount` when computing net totals.
    pub fn sign(self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }
}

impl TryFrom<&str> for FinancialKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid financial type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Financial {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub account_id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub kind: FinancialKind,
    pub is_transfer: bool,
}

impl TryFrom<Model> for Financial {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            account_id: model.id_account,
            user_id: model.user_id,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            transaction_date: model.transaction_date,
            kind: FinancialKind::try_from(model.kind.as_str())?,
            is_transfer: model.is_transfer,
        })
    }
}

/// A financial enriched with the names of what it references.
///
/// Field order and names double as the CSV export header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinancialRow {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub id_account: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub transaction_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: FinancialKind,
    pub is_transfer: bool,
    pub account_name: String,
    pub category_name: String,
    pub subcategory_name: Option<String>,
}

/// Raw shape of the joined listing query.
#[derive(Debug, FromQueryResult)]
pub(crate) struct FinancialRowModel {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub id_account: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub kind: String,
    pub is_transfer: bool,
    pub account_name: String,
    pub category_name: String,
    pub subcategory_name: Option<String>,
}

impl TryFrom<FinancialRowModel> for FinancialRow {
    type Error = EngineError;

    fn try_from(model: FinancialRowModel) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            id_account: model.id_account,
            user_id: model.user_id,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            transaction_date: model.transaction_date,
            kind: FinancialKind::try_from(model.kind.as_str())?,
            is_transfer: model.is_transfer,
            account_name: model.account_name,
            category_name: model.category_name,
            subcategory_name: model.subcategory_name,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "financials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub id_account: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub transaction_date: Date,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub is_transfer: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // No store-level foreign key: accounts may be deleted under their rows.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::IdAccount",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Subcategories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
