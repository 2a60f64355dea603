use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, accounts, categories, subcategories};

use super::Engine;

/// Generates a `require_*` method that loads a row by id, scoped to the
/// owning user, or fails with `NotFound`.
macro_rules! impl_owned_by_user {
    ($require_fn:ident, $module:ident, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: i64,
            id: i64,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id)
                .filter($module::Column::UserId.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("{} {id} not found", $label)))
        }
    };
}

impl Engine {
    impl_owned_by_user!(require_account, accounts, "account");
    impl_owned_by_user!(require_category, categories, "category");
    impl_owned_by_user!(require_subcategory, subcategories, "subcategory");
}
