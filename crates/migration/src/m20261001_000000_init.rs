//! Initial schema for CashWise.
//!
//! - `counters`: one row per id sequence (`userID`, `transactionID`, ...)
//! - `users`: accounts, unique by email
//! - `settings`: per-user preference flags
//! - `budgets`: spending limits per period
//! - `categories`: user-scoped categories, optionally tied to a budget
//! - `transactions`: income / expense / goal movements
//! - `goals`: savings goals
//!
//! Ids are allocated from `counters`, so no table uses autoincrement.
//! `transactions.category_id` has no foreign key: deleting a category keeps
//! the transactions that referenced it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Counters {
    Table,
    Name,
    Seq,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
    FullName,
    Email,
    PasswordHash,
    ProfilePicture,
    Role,
}

#[derive(Iden)]
enum Settings {
    Table,
    UserId,
    DarkTheme,
    TermsCondition,
    Notification,
}

#[derive(Iden)]
enum Budgets {
    Table,
    BudgetId,
    UserId,
    Name,
    InitialBalanceMinor,
    LimitMinor,
    Period,
}

#[derive(Iden)]
enum Categories {
    Table,
    CategoryId,
    UserId,
    BudgetId,
    Name,
    Description,
    Icon,
}

#[derive(Iden)]
enum Transactions {
    Table,
    TransactionId,
    UserId,
    CategoryId,
    Kind,
    AmountMinor,
    Date,
    Description,
}

#[derive(Iden)]
enum Goals {
    Table,
    GoalId,
    UserId,
    Name,
    TargetMinor,
    CurrentMinor,
    Deadline,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Counters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Counters::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Counters::Seq).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::ProfilePicture)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Settings::DarkTheme)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Settings::TermsCondition)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Settings::Notification)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settings-user_id")
                            .from(Settings::Table, Settings::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::BudgetId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Budgets::InitialBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Budgets::LimitMinor).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::Period).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-user_id")
                            .from(Budgets::Table, Budgets::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::CategoryId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Categories::BudgetId).big_integer())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Categories::Icon).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-budget_id")
                            .from(Categories::Table, Categories::BudgetId)
                            .to(Budgets::Table, Budgets::BudgetId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Date).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Goals::GoalId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Goals::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Goals::Name).string().not_null())
                    .col(ColumnDef::new(Goals::TargetMinor).big_integer().not_null())
                    .col(ColumnDef::new(Goals::CurrentMinor).big_integer().not_null())
                    .col(ColumnDef::new(Goals::Deadline).string().not_null())
                    .col(ColumnDef::new(Goals::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-user_id")
                            .from(Goals::Table, Goals::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order so foreign keys never dangle.
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Counters::Table).to_owned())
            .await?;
        Ok(())
    }
}
