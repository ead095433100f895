use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::prelude::*;

mod accounts;
mod credentials;

/// Creates tables and indexes if they are missing. Safe to run on every start.
pub async fn apply(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let manager = SchemaManager::new(conn);

    accounts::apply(&manager).await?;
    credentials::apply(&manager).await?;
    apply_unique_identities(conn).await?;

    Ok(())
}

/// Usernames and email addresses are unique among rows that are not deleted.
/// The use case checks this before writing; these indexes catch the writers
/// that race past that check.
async fn apply_unique_identities(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();

    for column in ["username", "email_address"] {
        conn.execute(Statement::from_string(
            backend,
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS accounts_{column}_unique \
                 ON accounts ({column}) WHERE status <> 'deleted'"
            ),
        ))
        .await?;
    }

    Ok(())
}
