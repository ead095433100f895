use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    // SQLite only auto-increments an INTEGER primary key.
    let mut account_id = ColumnDef::new(Accounts::AccountId);
    match manager.get_database_backend() {
        DbBackend::Sqlite => account_id.integer(),
        _ => account_id.big_integer(),
    };

    manager
        .create_table(
            Table::create()
                .table(Accounts::Table)
                .if_not_exists()
                .col(account_id.not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Accounts::Username).string().not_null())
                .col(ColumnDef::new(Accounts::EmailAddress).string().not_null())
                .col(
                    ColumnDef::new(Accounts::Status)
                        .string_len(16)
                        .not_null()
                        .default("active"),
                )
                .col(ColumnDef::new(Accounts::EmailAddressVerifiedAt).timestamp_with_time_zone())
                .col(
                    ColumnDef::new(Accounts::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .col(
                    ColumnDef::new(Accounts::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .to_owned(),
        )
        .await
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    AccountId,
    Username,
    EmailAddress,
    Status,
    EmailAddressVerifiedAt,
    CreatedAt,
    UpdatedAt,
}
