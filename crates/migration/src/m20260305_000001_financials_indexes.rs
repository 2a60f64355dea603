use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Financials {
    Table,
    UserId,
    IdAccount,
    TransactionDate,
}

#[derive(Iden)]
enum Subcategories {
    Table,
    UserId,
    CategoryId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dashboard windows and the default listing order.
        manager
            .create_index(
                Index::create()
                    .name("idx-financials-user_id-transaction_date")
                    .table(Financials::Table)
                    .col(Financials::UserId)
                    .col(Financials::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // Account net totals and the `id_account` listing filter.
        manager
            .create_index(
                Index::create()
                    .name("idx-financials-id_account")
                    .table(Financials::Table)
                    .col(Financials::IdAccount)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-subcategories-user_id-category_id")
                    .table(Subcategories::Table)
                    .col(Subcategories::UserId)
                    .col(Subcategories::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-subcategories-user_id-category_id")
                    .table(Subcategories::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-financials-id_account")
                    .table(Financials::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-financials-user_id-transaction_date")
                    .table(Financials::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
