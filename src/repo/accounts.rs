use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};

use crate::{
    entities::accounts,
    models::{Account, AccountChanges, AccountFilter, Status, StatusFilter},
};

pub struct AccountsRepo<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> AccountsRepo<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn with_status(
        query: Select<accounts::Entity>,
        status: StatusFilter,
    ) -> Select<accounts::Entity> {
        match status {
            StatusFilter::Only(status) => {
                query.filter(accounts::Column::Status.eq(status.as_str()))
            }
            StatusFilter::NotDeleted => {
                query.filter(accounts::Column::Status.ne(Status::Deleted.as_str()))
            }
            StatusFilter::Any => query,
        }
    }

    pub async fn create(
        &self,
        username: &str,
        email_address: &str,
        status: Status,
    ) -> Result<Account, DbErr> {
        let now = Utc::now();
        let model = accounts::ActiveModel {
            username: Set(username.to_string()),
            email_address: Set(email_address.to_string()),
            status: Set(status.as_str().to_string()),
            email_address_verified_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        model.insert(self.conn).await?.try_into()
    }

    pub async fn fetch_one(&self, filter: &AccountFilter) -> Result<Option<Account>, DbErr> {
        let mut query = accounts::Entity::find();
        if let Some(account_id) = filter.account_id {
            query = query.filter(accounts::Column::AccountId.eq(account_id));
        }
        if let Some(username) = &filter.username {
            query = query.filter(accounts::Column::Username.eq(username.as_str()));
        }
        if let Some(email_address) = &filter.email_address {
            query = query.filter(accounts::Column::EmailAddress.eq(email_address.as_str()));
        }

        Self::with_status(query, filter.status)
            .order_by_asc(accounts::Column::AccountId)
            .one(self.conn)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    pub async fn fetch_all(&self, status: StatusFilter) -> Result<Vec<Account>, DbErr> {
        Self::with_status(accounts::Entity::find(), status)
            .order_by_asc(accounts::Column::AccountId)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    /// Writes exactly the given columns plus `updated_at`.
    ///
    /// Returns `None` when no row has `account_id`.
    ///
    /// # Panics
    ///
    /// Panics if `changes` is empty.
    pub async fn partial_update(
        &self,
        account_id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, DbErr> {
        assert!(
            !changes.is_empty(),
            "partial_update requires at least one changed field"
        );

        let mut active = accounts::ActiveModel {
            account_id: Unchanged(account_id),
            ..Default::default()
        };
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email_address) = changes.email_address {
            active.email_address = Set(email_address);
        }
        if let Some(verified_at) = changes.email_address_verified_at {
            active.email_address_verified_at = Set(verified_at.map(Into::into));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(Utc::now().into());

        match active.update(self.conn).await {
            Ok(model) => Ok(Some(model.try_into()?)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Soft delete. Rows that are already deleted count as absent.
    pub async fn delete(&self, account_id: i64) -> Result<Option<Account>, DbErr> {
        let Some(model) = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::Status.ne(Status::Deleted.as_str()))
            .one(self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: accounts::ActiveModel = model.into();
        active.status = Set(Status::Deleted.as_str().to_string());
        active.updated_at = Set(Utc::now().into());
        Ok(Some(active.update(self.conn).await?.try_into()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use sea_orm::{Database, DatabaseConnection};

    async fn setup() -> Result<DatabaseConnection, DbErr> {
        let conn = Database::connect("sqlite::memory:").await?;
        schema::apply(&conn).await?;
        Ok(conn)
    }

    #[tokio::test]
    async fn create_returns_the_persisted_row() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let account = repo
            .create("alice", "alice@example.com", Status::Active)
            .await?;

        assert!(account.account_id > 0);
        assert_eq!(account.username, "alice");
        assert_eq!(account.status, Status::Active);
        assert_eq!(account.email_address_verified_at, None);
        Ok(())
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicate_live_usernames() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let first = repo.create("alice", "alice@example.com", Status::Active).await?;
        assert!(repo
            .create("alice", "other@example.com", Status::Active)
            .await
            .is_err());

        repo.delete(first.account_id).await?;
        repo.create("alice", "other@example.com", Status::Active)
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn fetch_one_defaults_to_active_accounts() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let account = repo.create("alice", "alice@example.com", Status::Active).await?;
        repo.delete(account.account_id).await?;

        let filter = AccountFilter::by_id(account.account_id);
        assert_eq!(repo.fetch_one(&filter).await?, None);

        let deleted = repo
            .fetch_one(&filter.clone().with_status(StatusFilter::Any))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("account".to_string()))?;
        assert_eq!(deleted.status, Status::Deleted);

        let deleted = repo
            .fetch_one(&filter.with_status(Status::Deleted))
            .await?;
        assert!(deleted.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn fetch_one_combines_filters() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        repo.create("alice", "alice@example.com", Status::Active).await?;
        repo.create("bob", "bob@example.com", Status::Active).await?;

        let filter = AccountFilter {
            username: Some("alice".to_string()),
            email_address: Some("bob@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.fetch_one(&filter).await?, None);

        let bob = repo
            .fetch_one(&AccountFilter::by_email_address("bob@example.com"))
            .await?;
        assert_eq!(bob.map(|account| account.username).as_deref(), Some("bob"));
        Ok(())
    }

    #[tokio::test]
    async fn fetch_all_filters_by_status_in_id_order() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let alice = repo.create("alice", "alice@example.com", Status::Active).await?;
        let bob = repo.create("bob", "bob@example.com", Status::Active).await?;
        let carol = repo
            .create("carol", "carol@example.com", Status::Suspended)
            .await?;
        repo.delete(bob.account_id).await?;

        let live = repo.fetch_all(StatusFilter::NotDeleted).await?;
        assert_eq!(
            live.iter().map(|a| a.account_id).collect::<Vec<_>>(),
            vec![alice.account_id, carol.account_id]
        );

        let active = repo.fetch_all(StatusFilter::default()).await?;
        assert_eq!(
            active.iter().map(|a| a.account_id).collect::<Vec<_>>(),
            vec![alice.account_id]
        );

        let everyone = repo.fetch_all(StatusFilter::Any).await?;
        assert_eq!(
            everyone.iter().map(|a| a.account_id).collect::<Vec<_>>(),
            vec![alice.account_id, bob.account_id, carol.account_id]
        );
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_writes_only_given_fields() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let account = repo.create("alice", "alice@example.com", Status::Active).await?;
        let changes = AccountChanges {
            email_address: Some("new@example.com".to_string()),
            email_address_verified_at: Some(None),
            ..Default::default()
        };

        let updated = repo
            .partial_update(account.account_id, changes)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("account".to_string()))?;

        assert_eq!(updated.username, "alice");
        assert_eq!(updated.email_address, "new@example.com");
        assert!(updated.updated_at >= account.updated_at);
        assert_eq!(updated.created_at, account.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_reports_missing_rows() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let changes = AccountChanges {
            status: Some(Status::Suspended),
            ..Default::default()
        };
        assert_eq!(repo.partial_update(404, changes).await?, None);
        Ok(())
    }

    #[tokio::test]
    #[should_panic(expected = "at least one changed field")]
    async fn partial_update_rejects_empty_change_sets() {
        let conn = setup().await.expect("database");
        let repo = AccountsRepo::new(&conn);
        let _ = repo.partial_update(1, AccountChanges::default()).await;
    }

    #[tokio::test]
    async fn delete_flips_status_once() -> Result<(), DbErr> {
        let conn = setup().await?;
        let repo = AccountsRepo::new(&conn);

        let account = repo.create("alice", "alice@example.com", Status::Active).await?;

        let deleted = repo
            .delete(account.account_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("account".to_string()))?;
        assert_eq!(deleted.status, Status::Deleted);
        assert_eq!(repo.delete(account.account_id).await?, None);
        assert_eq!(repo.delete(404).await?, None);
        Ok(())
    }
}
