use sea_orm_migration::prelude::*;

use super::accounts::Accounts;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Credentials::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Credentials::CredentialsId)
                        .uuid()
                        .not_null()
                        .primary_key(),
                )
                .col(ColumnDef::new(Credentials::AccountId).big_integer().not_null())
                .col(
                    ColumnDef::new(Credentials::IdentifierType)
                        .string_len(16)
                        .not_null(),
                )
                .col(ColumnDef::new(Credentials::Identifier).string().not_null())
                .col(ColumnDef::new(Credentials::Passphrase).string().not_null())
                .col(
                    ColumnDef::new(Credentials::Status)
                        .string_len(16)
                        .not_null()
                        .default("active"),
                )
                .col(
                    ColumnDef::new(Credentials::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .col(
                    ColumnDef::new(Credentials::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("credentials_account_id_fkey")
                        .from(Credentials::Table, Credentials::AccountId)
                        .to(Accounts::Table, Accounts::AccountId),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name("credentials_account_id_status_idx")
                .table(Credentials::Table)
                .col(Credentials::AccountId)
                .col(Credentials::Status)
                .to_owned(),
        )
        .await
}

#[derive(Iden)]
enum Credentials {
    Table,
    CredentialsId,
    AccountId,
    IdentifierType,
    Identifier,
    Passphrase,
    Status,
    CreatedAt,
    UpdatedAt,
}
