use sea_orm_migration::prelude::*;

use super::initial_001::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CreditTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditTransactions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(CreditTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::Reason)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_transactions_user")
                            .from(CreditTransactions::Table, CreditTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_credit_transactions_user_created")
                    .table(CreditTransactions::Table)
                    .col(CreditTransactions::UserId)
                    .col(CreditTransactions::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(CreditTransactions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum CreditTransactions {
    Table,
    Id,
    UserId,
    Amount,
    BalanceAfter,
    Reason,
    CreatedAt,
}
