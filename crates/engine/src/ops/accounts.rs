use sea_orm::{
    ActiveValue, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{Account, AccountBalance, EngineError, ResultEngine, accounts, financials};

use super::{
    Engine, Page, PageRequest, balances::net_total_expr, listing::ApplyListing,
    normalize_required_name, with_tx,
};

impl Engine {
    /// Create an account owned by `user_id`.
    pub async fn new_account(&self, user_id: i64, name: Option<&str>) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        with_tx!(self, |db_tx| {
            let model = accounts::ActiveModel {
                name: ActiveValue::Set(name),
                user_id: ActiveValue::Set(user_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(Account::from(model))
        })
    }

    /// Lists accounts with their net total, ordered by id.
    ///
    /// Accounts without financials report a net total of `0`.
    pub async fn list_accounts(
        &self,
        user_id: i64,
        page: PageRequest,
        search: Option<&str>,
    ) -> ResultEngine<Page<AccountBalance>> {
        self.validate_page(page)?;
        with_tx!(self, |db_tx| {
            let row_count = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .search_name(accounts::Column::Name, search)
                .count(&db_tx)
                .await?;

            let rows = accounts::Entity::find()
                .select_only()
                .column(accounts::Column::Id)
                .column(accounts::Column::Name)
                .column_as(net_total_expr(), "net_total")
                .join(JoinType::LeftJoin, accounts::Relation::Financials.def())
                .filter(accounts::Column::UserId.eq(user_id))
                .search_name(accounts::Column::Name, search)
                .group_by(accounts::Column::Id)
                .group_by(accounts::Column::Name)
                .order_by_asc(accounts::Column::Id)
                .paginate_by(page)
                .into_model::<AccountBalance>()
                .all(&db_tx)
                .await?;

            Ok(Page { rows, row_count })
        })
    }

    /// Delete an account by id.
    ///
    /// Financials that reference the account are left in place: they drop out
    /// of listings and exports but still count towards the dashboard.
    pub async fn delete_account(&self, user_id: i64, account_id: i64) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let orphaned = financials::Entity::find()
                .filter(financials::Column::UserId.eq(user_id))
                .filter(financials::Column::IdAccount.eq(account_id))
                .count(&db_tx)
                .await?;

            let res = accounts::Entity::delete_many()
                .filter(accounts::Column::Id.eq(account_id))
                .filter(accounts::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::NotFound(format!(
                    "account {account_id} not found"
                )));
            }

            if orphaned > 0 {
                tracing::warn!(
                    user_id,
                    account_id,
                    orphaned,
                    "deleted account still referenced by financials"
                );
            }
            Ok(res.rows_affected)
        })
    }
}
