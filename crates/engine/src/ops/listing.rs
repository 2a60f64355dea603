//! Pagination, sorting and search shared by every listing.

use sea_orm::{
    Order, QueryFilter, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::{EngineError, ResultEngine, accounts, categories, financials, subcategories};

/// `offset = page × limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

/// One page of rows plus the number of rows matching the filter, ignoring
/// pagination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub row_count: u64,
}

impl<T> Page<T> {
    pub(super) fn try_map<U, F>(self, f: F) -> ResultEngine<Page<U>>
    where
        F: FnMut(T) -> ResultEngine<U>,
    {
        Ok(Page {
            rows: self.rows.into_iter().map(f).collect::<ResultEngine<_>>()?,
            row_count: self.row_count,
        })
    }
}

/// Columns a financial listing may be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    TransactionDate,
    Amount,
    Name,
    Type,
    AccountName,
    CategoryName,
    SubcategoryName,
    IsTransfer,
    Id,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TransactionDate => "transaction_date",
            Self::Amount => "amount",
            Self::Name => "name",
            Self::Type => "type",
            Self::AccountName => "account_name",
            Self::CategoryName => "category_name",
            Self::SubcategoryName => "subcategory_name",
            Self::IsTransfer => "is_transfer",
            Self::Id => "id",
        }
    }

    fn expr(self) -> SimpleExpr {
        match self {
            Self::TransactionDate => financial_col(financials::Column::TransactionDate),
            Self::Amount => financial_col(financials::Column::Amount),
            Self::Name => financial_col(financials::Column::Name),
            Self::Type => financial_col(financials::Column::Kind),
            Self::IsTransfer => financial_col(financials::Column::IsTransfer),
            Self::Id => financial_col(financials::Column::Id),
            Self::AccountName => Expr::col((accounts::Entity, accounts::Column::Name)).into(),
            Self::CategoryName => Expr::col((categories::Entity, categories::Column::Name)).into(),
            Self::SubcategoryName => {
                Expr::col((subcategories::Entity, subcategories::Column::Name)).into()
            }
        }
    }
}

fn financial_col(column: financials::Column) -> SimpleExpr {
    Expr::col((financials::Entity, column)).into()
}

impl TryFrom<&str> for SortKey {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "transaction_date" => Ok(Self::TransactionDate),
            "amount" => Ok(Self::Amount),
            "name" => Ok(Self::Name),
            "type" => Ok(Self::Type),
            "account_name" => Ok(Self::AccountName),
            "category_name" => Ok(Self::CategoryName),
            "subcategory_name" => Ok(Self::SubcategoryName),
            "is_transfer" => Ok(Self::IsTransfer),
            "id" => Ok(Self::Id),
            other => Err(EngineError::Validation(format!("invalid sort key: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

impl TryFrom<&str> for SortDirection {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(EngineError::Validation(format!(
                "invalid sort direction: {value}"
            )))
        }
    }
}

/// Filters for listing financials.
///
/// Defaults to every account, newest `transaction_date` first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinancialListFilter {
    pub account_id: Option<i64>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

pub(super) trait ApplyListing: QuerySelect + QueryOrder + QueryFilter + Sized {
    /// `OFFSET page × limit LIMIT limit`.
    fn paginate_by(self, page: PageRequest) -> Self {
        self.offset(page.page * page.limit).limit(page.limit)
    }

    /// Case-insensitive substring match of `column` against `search`.
    fn search_name<C>(self, column: C, search: Option<&str>) -> Self
    where
        C: ColumnTrait,
    {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => self.filter(name_contains(column, term)),
            None => self,
        }
    }

    /// Apply the chosen order plus `id DESC` so equal keys page stably.
    fn sort_financials(self, filter: &FinancialListFilter) -> Self {
        let query = self.order_by(filter.sort_key.expr(), filter.direction.order());
        if filter.sort_key == SortKey::Id {
            query
        } else {
            query.order_by(SortKey::Id.expr(), Order::Desc)
        }
    }
}

impl<T> ApplyListing for T where T: QuerySelect + QueryOrder + QueryFilter + Sized {}

/// Case-insensitive substring match, folded in the store.
///
/// SQLite's `LOWER`/`UPPER` only fold ASCII, so the term is folded both ways
/// and each side is compared against the same fold of the column: a name with
/// a non-ASCII capital still meets the upper-cased term and vice versa.
fn name_contains<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let upper = format!("%{}%", escape_like(&term.to_uppercase()));
    let lower = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::upper(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(upper).escape('\\'))
        .or(Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
            .like(LikeExpr::new(lower).escape('\\')))
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

impl super::Engine {
    pub(super) fn validate_page(&self, page: PageRequest) -> ResultEngine<()> {
        if page.limit == 0 || page.limit > self.max_page_size {
            return Err(EngineError::Validation(format!(
                "limit must be between 1 and {}",
                self.max_page_size
            )));
        }
        if page.page.checked_mul(page.limit).is_none() {
            return Err(EngineError::Validation("page out of range".to_string()));
        }
        Ok(())
    }
}
