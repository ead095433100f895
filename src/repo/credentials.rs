use chrono::Utc;
use sea_orm::{
    prelude::DateTimeWithTimeZone, sea_query::Expr, ActiveModelTrait, ColumnTrait,
    ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    entities::credentials,
    models::{Credential, IdentifierType, NewCredential, Status},
};

pub struct CredentialsRepo<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> CredentialsRepo<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, credential: NewCredential) -> Result<Credential, DbErr> {
        let now = Utc::now();
        let model = credentials::ActiveModel {
            credentials_id: Set(credential.credentials_id),
            account_id: Set(credential.account_id),
            identifier_type: Set(credential.identifier_type.as_str().to_string()),
            identifier: Set(credential.identifier),
            passphrase: Set(credential.passphrase),
            status: Set(Status::Active.as_str().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        model.insert(self.conn).await?.try_into()
    }

    pub async fn fetch_one(&self, credentials_id: Uuid) -> Result<Option<Credential>, DbErr> {
        credentials::Entity::find_by_id(credentials_id)
            .one(self.conn)
            .await?
            .map(Credential::try_from)
            .transpose()
    }

    pub async fn fetch_all(
        &self,
        account_id: i64,
        status: Status,
    ) -> Result<Vec<Credential>, DbErr> {
        credentials::Entity::find()
            .filter(credentials::Column::AccountId.eq(account_id))
            .filter(credentials::Column::Status.eq(status.as_str()))
            .order_by_asc(credentials::Column::CreatedAt)
            .order_by_asc(credentials::Column::IdentifierType)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Credential::try_from)
            .collect()
    }

    /// Points the account's active credential of `identifier_type` at a new
    /// identifier. Returns the number of rows changed.
    pub async fn update_identifier(
        &self,
        account_id: i64,
        identifier_type: IdentifierType,
        identifier: &str,
    ) -> Result<u64, DbErr> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = credentials::Entity::update_many()
            .col_expr(credentials::Column::Identifier, Expr::value(identifier))
            .col_expr(credentials::Column::UpdatedAt, Expr::value(now))
            .filter(credentials::Column::AccountId.eq(account_id))
            .filter(credentials::Column::IdentifierType.eq(identifier_type.as_str()))
            .filter(credentials::Column::Status.eq(Status::Active.as_str()))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Soft delete. Unknown or already deleted credentials count as absent.
    pub async fn delete(&self, credentials_id: Uuid) -> Result<Option<Credential>, DbErr> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = credentials::Entity::update_many()
            .col_expr(
                credentials::Column::Status,
                Expr::value(Status::Deleted.as_str()),
            )
            .col_expr(credentials::Column::UpdatedAt, Expr::value(now))
            .filter(credentials::Column::CredentialsId.eq(credentials_id))
            .filter(credentials::Column::Status.ne(Status::Deleted.as_str()))
            .exec(self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.fetch_one(credentials_id).await
    }
}
