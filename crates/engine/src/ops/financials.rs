use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, JoinType, PaginatorTrait, QueryFilter, QuerySelect, Select,
    TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Financial, FinancialKind, FinancialRow, ResultEngine, accounts, categories,
    financials::{self, FinancialRowModel},
    subcategories,
};

use super::{
    Engine, FinancialListFilter, Page, PageRequest, listing::ApplyListing,
    normalize_required_name, with_tx,
};

/// Input for [`Engine::new_financial`]. Every field may be missing on the
/// wire; missing required fields are reported as validation errors.
///
/// `kind` is `income`, `expense` or `transfer` (any case). A transfer moves
/// `amount` from `account_id` to `account_to_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewFinancial {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub account_id: Option<i64>,
    pub account_to_id: Option<i64>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub transaction_date: Option<NaiveDate>,
    pub kind: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Movement {
    Single(FinancialKind),
    Transfer { to: i64 },
}

#[derive(Clone, Debug)]
struct ValidatedFinancial {
    name: String,
    amount: i64,
    account_id: i64,
    category_id: i64,
    subcategory_id: Option<i64>,
    transaction_date: NaiveDate,
    movement: Movement,
}

fn required<T>(value: Option<T>, field: &str) -> ResultEngine<T> {
    value.ok_or_else(|| EngineError::Validation(format!("{field} is required")))
}

impl TryFrom<NewFinancial> for ValidatedFinancial {
    type Error = EngineError;

    fn try_from(input: NewFinancial) -> ResultEngine<Self> {
        let name = normalize_required_name(input.name.as_deref(), "financial")?;
        let amount = required(input.amount, "amount")?;
        if amount < 0 {
            return Err(EngineError::Validation("amount must be >= 0".to_string()));
        }
        let account_id = required(input.account_id, "id_account")?;
        let category_id = required(input.category_id, "id_category")?;
        let transaction_date = required(input.transaction_date, "transactionDate")?;
        let kind = required(input.kind, "type")?.trim().to_ascii_lowercase();

        let movement = if kind == "transfer" {
            let to = required(input.account_to_id, "id_account_to")?;
            if to == account_id {
                return Err(EngineError::Validation(
                    "transfer source and destination must differ".to_string(),
                ));
            }
            Movement::Transfer { to }
        } else {
            Movement::Single(FinancialKind::try_from(kind.as_str())?)
        };

        Ok(Self {
            name,
            amount,
            account_id,
            category_id,
            subcategory_id: input.subcategory_id,
            transaction_date,
            movement,
        })
    }
}

impl Engine {
    /// Record a financial.
    ///
    /// A transfer is written as two rows in one database transaction: an
    /// expense on the source account, then an income on the destination, both
    /// flagged `is_transfer`. Either both rows persist or neither does. The
    /// returned rows follow insertion order.
    pub async fn new_financial(
        &self,
        user_id: i64,
        input: NewFinancial,
    ) -> ResultEngine<Vec<Financial>> {
        let entry = ValidatedFinancial::try_from(input)?;
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, entry.account_id)
                .await?;
            self.require_category(&db_tx, user_id, entry.category_id)
                .await?;
            if let Some(subcategory_id) = entry.subcategory_id {
                let subcategory = self
                    .require_subcategory(&db_tx, user_id, subcategory_id)
                    .await?;
                if subcategory.category_id != entry.category_id {
                    return Err(EngineError::Validation(format!(
                        "subcategory {subcategory_id} does not belong to category {}",
                        entry.category_id
                    )));
                }
            }

            match entry.movement {
                Movement::Single(kind) => {
                    let row = Self::insert_financial(
                        &db_tx,
                        user_id,
                        &entry,
                        entry.account_id,
                        kind,
                        false,
                    )
                    .await?;
                    Ok(vec![row])
                }
                Movement::Transfer { to } => {
                    self.require_account(&db_tx, user_id, to).await?;
                    let outgoing = Self::insert_financial(
                        &db_tx,
                        user_id,
                        &entry,
                        entry.account_id,
                        FinancialKind::Expense,
                        true,
                    )
                    .await?;
                    let incoming = Self::insert_financial(
                        &db_tx,
                        user_id,
                        &entry,
                        to,
                        FinancialKind::Income,
                        true,
                    )
                    .await?;
                    Ok(vec![outgoing, incoming])
                }
            }
        })
    }

    async fn insert_financial(
        db: &DatabaseTransaction,
        user_id: i64,
        entry: &ValidatedFinancial,
        account_id: i64,
        kind: FinancialKind,
        is_transfer: bool,
    ) -> ResultEngine<Financial> {
        let model = financials::ActiveModel {
            name: ActiveValue::Set(entry.name.clone()),
            amount: ActiveValue::Set(entry.amount),
            id_account: ActiveValue::Set(account_id),
            user_id: ActiveValue::Set(user_id),
            category_id: ActiveValue::Set(entry.category_id),
            subcategory_id: ActiveValue::Set(entry.subcategory_id),
            transaction_date: ActiveValue::Set(entry.transaction_date),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            is_transfer: ActiveValue::Set(is_transfer),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Financial::try_from(model)
    }

    /// Delete one financial. The other leg of a transfer is left untouched.
    pub async fn delete_financial(&self, user_id: i64, financial_id: i64) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let res = financials::Entity::delete_many()
                .filter(financials::Column::Id.eq(financial_id))
                .filter(financials::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::NotFound(format!(
                    "financial {financial_id} not found"
                )));
            }
            Ok(res.rows_affected)
        })
    }

    /// Lists financials joined with their account, category and (optional)
    /// subcategory names.
    pub async fn list_financials(
        &self,
        user_id: i64,
        page: PageRequest,
        filter: &FinancialListFilter,
    ) -> ResultEngine<Page<FinancialRow>> {
        self.validate_page(page)?;
        with_tx!(self, |db_tx| {
            let mut query = Self::financial_rows(user_id);
            if let Some(account_id) = filter.account_id {
                query = query.filter(financials::Column::IdAccount.eq(account_id));
            }

            let row_count = query.clone().count(&db_tx).await?;
            let rows = Self::select_row_columns(query)
                .sort_financials(filter)
                .paginate_by(page)
                .into_model::<FinancialRowModel>()
                .all(&db_tx)
                .await?;

            Page { rows, row_count }.try_map(FinancialRow::try_from)
        })
    }

    /// Every financial of `user_id` whose account still exists, joined with
    /// the referenced names.
    pub(super) fn financial_rows(user_id: i64) -> Select<financials::Entity> {
        financials::Entity::find()
            .join(JoinType::InnerJoin, financials::Relation::Accounts.def())
            .join(JoinType::InnerJoin, financials::Relation::Categories.def())
            .join(JoinType::LeftJoin, financials::Relation::Subcategories.def())
            .filter(financials::Column::UserId.eq(user_id))
    }

    pub(super) fn select_row_columns(
        query: Select<financials::Entity>,
    ) -> Select<financials::Entity> {
        query
            .select_only()
            .columns([
                financials::Column::Id,
                financials::Column::Name,
                financials::Column::Amount,
                financials::Column::IdAccount,
                financials::Column::UserId,
                financials::Column::CategoryId,
                financials::Column::SubcategoryId,
                financials::Column::TransactionDate,
            ])
            .column_as(financials::Column::Kind, "kind")
            .column(financials::Column::IsTransfer)
            .column_as(accounts::Column::Name, "account_name")
            .column_as(categories::Column::Name, "category_name")
            .column_as(subcategories::Column::Name, "subcategory_name")
    }
}
