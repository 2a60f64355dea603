use chrono::{Datelike, Days, NaiveDate};
use sea_orm::{
    DatabaseTransaction, FromQueryResult, JoinType, Order, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
    prelude::*,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::{EngineError, FinancialKind, ResultEngine, categories, financials};

use super::{Engine, with_tx};

/// Unsigned income and expense sums over a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromQueryResult)]
pub struct WindowTotals {
    pub total_income: i64,
    pub total_expense: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct CategoryExpense {
    pub category_id: i64,
    pub category_name: String,
    pub total_expense: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    /// Categories with a positive expense sum, largest first.
    pub expenses_by_category: Vec<CategoryExpense>,
    pub all_time: WindowTotals,
    /// `[Jan 1 of last year, Jan 1 of this year)`.
    pub prev_year: WindowTotals,
    /// `[Jan 1 of this year, today]`.
    pub year_to_date: WindowTotals,
}

fn amount() -> Expr {
    Expr::col((financials::Entity, financials::Column::Amount))
}

fn kind_is(kind: FinancialKind) -> SimpleExpr {
    Expr::col((financials::Entity, financials::Column::Kind)).eq(kind.as_str())
}

/// `CAST(COALESCE(SUM(expr), 0) AS BIGINT)`: empty groups yield `0`, and
/// Postgres' numeric `SUM` comes back as an integer.
fn sum_or_zero(expr: impl Into<SimpleExpr>) -> SimpleExpr {
    let summed: SimpleExpr = Func::sum(expr).into();
    Func::cast_as(
        Func::coalesce([summed, Expr::val(0i64).into()]),
        Alias::new("BIGINT"),
    )
    .into()
}

/// Sum of `amount` over rows of one kind.
pub(super) fn kind_total_expr(kind: FinancialKind) -> SimpleExpr {
    sum_or_zero(Expr::case(kind_is(kind), amount()).finally(0i64))
}

/// `Σ income − Σ expense`.
pub(super) fn net_total_expr() -> SimpleExpr {
    let signed = Expr::case(
        kind_is(FinancialKind::Income),
        amount().mul(FinancialKind::Income.sign()),
    )
    .case(
        kind_is(FinancialKind::Expense),
        amount().mul(FinancialKind::Expense.sign()),
    )
    .finally(0i64);
    sum_or_zero(signed)
}

fn year_start(year: i32) -> ResultEngine<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| EngineError::Validation(format!("year {year} out of range")))
}

impl Engine {
    /// Dashboard summary for `user_id` as of `today`.
    ///
    /// All four reads share one database transaction. On SQLite that is a
    /// single snapshot; on Postgres under READ COMMITTED every statement takes
    /// its own snapshot, so a write committed between them can show up in one
    /// window and not in another. Totals are not cached anywhere.
    pub async fn dashboard(&self, user_id: i64, today: NaiveDate) -> ResultEngine<Dashboard> {
        let this_year = year_start(today.year())?;
        let last_year = year_start(today.year() - 1)?;
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| EngineError::Validation(format!("date {today} out of range")))?;

        with_tx!(self, |db_tx| {
            let all_time = Self::window_totals(&db_tx, user_id, None).await?;
            let prev_year =
                Self::window_totals(&db_tx, user_id, Some((last_year, this_year))).await?;
            let year_to_date =
                Self::window_totals(&db_tx, user_id, Some((this_year, tomorrow))).await?;
            let expenses_by_category = Self::expenses_by_category(&db_tx, user_id).await?;

            Ok(Dashboard {
                expenses_by_category,
                all_time,
                prev_year,
                year_to_date,
            })
        })
    }

    /// Totals over `[from, to)`, or over everything when `range` is `None`.
    async fn window_totals(
        db: &DatabaseTransaction,
        user_id: i64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> ResultEngine<WindowTotals> {
        let mut query = financials::Entity::find()
            .select_only()
            .column_as(kind_total_expr(FinancialKind::Income), "total_income")
            .column_as(kind_total_expr(FinancialKind::Expense), "total_expense")
            .filter(financials::Column::UserId.eq(user_id));
        if let Some((from, to)) = range {
            query = query
                .filter(financials::Column::TransactionDate.gte(from))
                .filter(financials::Column::TransactionDate.lt(to));
        }

        let totals = query.into_model::<WindowTotals>().one(db).await?;
        Ok(totals.unwrap_or_default())
    }

    async fn expenses_by_category(
        db: &DatabaseTransaction,
        user_id: i64,
    ) -> ResultEngine<Vec<CategoryExpense>> {
        let expense = kind_total_expr(FinancialKind::Expense);
        let rows = financials::Entity::find()
            .select_only()
            .column(financials::Column::CategoryId)
            .column_as(categories::Column::Name, "category_name")
            .column_as(expense.clone(), "total_expense")
            .join(JoinType::InnerJoin, financials::Relation::Categories.def())
            .filter(financials::Column::UserId.eq(user_id))
            .group_by(financials::Column::CategoryId)
            .group_by(categories::Column::Name)
            .having(Expr::expr(expense.clone()).gt(0i64))
            .order_by(expense, Order::Desc)
            .order_by_asc(financials::Column::CategoryId)
            .into_model::<CategoryExpense>()
            .all(db)
            .await?;
        Ok(rows)
    }
}
