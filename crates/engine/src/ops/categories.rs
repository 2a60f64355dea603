use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{Category, EngineError, ResultEngine, categories, subcategories};

use super::{
    Engine, Page, PageRequest, listing::ApplyListing, normalize_required_name, with_tx,
};

const CATEGORY_IN_USE: &str =
    "Please remove all financials using this category before deleting it";

impl Engine {
    pub async fn new_category(&self, user_id: i64, name: Option<&str>) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            let model = categories::ActiveModel {
                name: ActiveValue::Set(name),
                user_id: ActiveValue::Set(user_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    pub async fn list_categories(
        &self,
        user_id: i64,
        page: PageRequest,
        search: Option<&str>,
    ) -> ResultEngine<Page<Category>> {
        self.validate_page(page)?;
        with_tx!(self, |db_tx| {
            let query = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .search_name(categories::Column::Name, search);

            let row_count = query.clone().count(&db_tx).await?;
            let rows = query
                .order_by_asc(categories::Column::Id)
                .paginate_by(page)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::from)
                .collect();

            Ok(Page { rows, row_count })
        })
    }

    /// Delete a category together with its subcategories.
    ///
    /// Fails with `ReferentialConflict` while any financial still uses the
    /// category or one of its subcategories; nothing is deleted in that case.
    pub async fn delete_category(&self, user_id: i64, category_id: i64) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;

            subcategories::Entity::delete_many()
                .filter(subcategories::Column::CategoryId.eq(category_id))
                .filter(subcategories::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await
                .map_err(|err| EngineError::referential(err, CATEGORY_IN_USE))?;

            let res = categories::Entity::delete_many()
                .filter(categories::Column::Id.eq(category_id))
                .filter(categories::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await
                .map_err(|err| EngineError::referential(err, CATEGORY_IN_USE))?;

            Ok(res.rows_affected)
        })
    }
}
