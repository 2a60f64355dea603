use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, Subcategory, subcategories};

use super::{
    Engine, Page, PageRequest, listing::ApplyListing, normalize_required_name, with_tx,
};

const SUBCATEGORY_IN_USE: &str =
    "Please remove all financials using this subcategory before deleting it";

impl Engine {
    /// Create a subcategory under a category owned by the same user.
    pub async fn new_subcategory(
        &self,
        user_id: i64,
        category_id: Option<i64>,
        name: Option<&str>,
    ) -> ResultEngine<Subcategory> {
        let name = normalize_required_name(name, "subcategory")?;
        let category_id = category_id
            .ok_or_else(|| EngineError::Validation("categoryId is required".to_string()))?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;
            let model = subcategories::ActiveModel {
                name: ActiveValue::Set(name),
                category_id: ActiveValue::Set(category_id),
                user_id: ActiveValue::Set(user_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(Subcategory::from(model))
        })
    }

    /// Lists the subcategories of one category.
    ///
    /// An unknown or foreign category simply yields an empty page.
    pub async fn list_subcategories(
        &self,
        user_id: i64,
        category_id: Option<i64>,
        page: PageRequest,
        search: Option<&str>,
    ) -> ResultEngine<Page<Subcategory>> {
        let category_id = category_id
            .ok_or_else(|| EngineError::Validation("id_category is required".to_string()))?;
        self.validate_page(page)?;
        with_tx!(self, |db_tx| {
            let query = subcategories::Entity::find()
                .filter(subcategories::Column::UserId.eq(user_id))
                .filter(subcategories::Column::CategoryId.eq(category_id))
                .search_name(subcategories::Column::Name, search);

            let row_count = query.clone().count(&db_tx).await?;
            let rows = query
                .order_by_asc(subcategories::Column::Id)
                .paginate_by(page)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Subcategory::from)
                .collect();

            Ok(Page { rows, row_count })
        })
    }

    pub async fn delete_subcategory(
        &self,
        user_id: i64,
        subcategory_id: i64,
    ) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let res = subcategories::Entity::delete_many()
                .filter(subcategories::Column::Id.eq(subcategory_id))
                .filter(subcategories::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await
                .map_err(|err| EngineError::referential(err, SUBCATEGORY_IN_USE))?;
            if res.rows_affected == 0 {
                return Err(EngineError::NotFound(format!(
                    "subcategory {subcategory_id} not found"
                )));
            }
            Ok(res.rows_affected)
        })
    }
}
